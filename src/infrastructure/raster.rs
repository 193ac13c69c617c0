//! 页面栅格的裁剪、二值化与编码

use crate::error::{AppResult, RasterError};
use crate::models::geometry::Rectangle;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GrayImage, ImageFormat, Luma, RgbaImage};
use std::io::Cursor;

/// 从整页栅格中裁出矩形区域
///
/// 矩形必须完整落在栅格内；结果尺寸恰为 `rect.width × rect.height`。
pub fn crop(raster: &RgbaImage, rect: &Rectangle) -> Result<RgbaImage, RasterError> {
    if !rect.fits_within(raster.width(), raster.height()) {
        return Err(RasterError::CropOutOfBounds {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            raster_width: raster.width(),
            raster_height: raster.height(),
        });
    }
    Ok(image::imageops::crop_imm(raster, rect.x, rect.y, rect.width, rect.height).to_image())
}

/// 灰度化（BT.601 亮度加权）后按阈值硬二值化：亮于阈值为白，否则为黑
pub fn binarize(raster: &RgbaImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(raster.width(), raster.height(), |x, y| {
        let [r, g, b, _] = raster.get_pixel(x, y).0;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        Luma([if luma > threshold as f32 { 255 } else { 0 }])
    })
}

/// 编码为 JPEG data URL；空图返回空字符串
pub fn encode_jpeg_data_url(raster: &RgbaImage, quality: u8) -> AppResult<String> {
    if raster.width() == 0 || raster.height() == 0 {
        return Ok(String::new());
    }
    let rgb = DynamicImage::ImageRgba8(raster.clone()).to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality).encode_image(&rgb)?;
    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes)))
}

/// 编码为 PNG 字节（交给 OCR 引擎）
pub fn encode_png(image: &GrayImage) -> AppResult<Vec<u8>> {
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(image.clone()).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn page(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([20, 20, 20, 255])
            }
        })
    }

    #[test]
    fn crop_yields_exact_dimensions() {
        let raster = page(200, 100);
        for rect in [
            Rectangle::new(0, 0, 1, 1),
            Rectangle::new(10, 20, 50, 30),
            Rectangle::new(150, 0, 50, 100),
            Rectangle::new(0, 0, 200, 100),
        ] {
            let cropped = crop(&raster, &rect).unwrap();
            assert_eq!((cropped.width(), cropped.height()), (rect.width, rect.height));
        }
    }

    #[test]
    fn crop_out_of_bounds_is_rejected() {
        let raster = page(200, 100);
        let err = crop(&raster, &Rectangle::new(190, 0, 20, 10)).unwrap_err();
        assert!(matches!(err, RasterError::CropOutOfBounds { .. }));
    }

    #[test]
    fn binarize_splits_light_and_dark() {
        let gray = binarize(&page(4, 1), 150);
        assert_eq!(gray.get_pixel(0, 0).0, [255]);
        assert_eq!(gray.get_pixel(3, 0).0, [0]);
    }

    #[test]
    fn jpeg_data_url_prefix_and_empty_image() {
        let url = encode_jpeg_data_url(&page(8, 8), 80).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(encode_jpeg_data_url(&RgbaImage::new(0, 0), 80).unwrap(), "");
    }

    #[test]
    fn png_round_trips_dimensions() {
        let bytes = encode_png(&binarize(&page(6, 3), 128)).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (6, 3));
    }
}

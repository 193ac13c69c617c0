//! 参考缩放空间中的几何类型
//!
//! 校准与抽取两条路径必须使用同一个渲染倍率，否则裁剪区域会错位。

use serde::{Deserialize, Serialize};

/// 页面渲染的参考倍率（相对 PDF 原生尺寸）
pub const REFERENCE_SCALE: f32 = 2.0;

/// 参考缩放空间中的像素矩形
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 面积为零
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// 四周各向外扩展 `padding` 像素，左上角在 0 处截断
    pub fn expand(&self, padding: u32) -> Self {
        let x = self.x.saturating_sub(padding);
        let y = self.y.saturating_sub(padding);
        Self {
            x,
            y,
            width: self.right().saturating_add(padding) - x,
            height: self.bottom().saturating_add(padding) - y,
        }
    }

    /// 点是否落在矩形内（含边界）
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.x as f32
            && px <= self.right() as f32
            && py >= self.y as f32
            && py <= self.bottom() as f32
    }

    /// 矩形是否完整落在 `width × height` 的画布内
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

impl std::fmt::Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{} {}x{}", self.x, self.y, self.width, self.height)
    }
}

impl std::str::FromStr for Rectangle {
    type Err = crate::error::CalibrationError;

    /// 解析 `x,y,width,height`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || crate::error::CalibrationError::RectangleParse {
            input: s.to_string(),
        };
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| parse_err())?;
        match parts.as_slice() {
            [x, y, width, height] => Ok(Self::new(*x, *y, *width, *height)),
            _ => Err(parse_err()),
        }
    }
}

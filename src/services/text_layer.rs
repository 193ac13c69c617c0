//! 从文本层中收集答案区域内的文字

use crate::infrastructure::pdf_backend::TextFragment;
use crate::models::geometry::Rectangle;
use regex::Regex;
use std::sync::LazyLock;

/// 答案框外扩的像素数，容忍校准与抽取之间的亚像素/字体度量偏差
pub const ANSWER_BOX_PADDING: u32 = 15;

/// 纵向差距在此范围内的片段视为同一行
pub const ROW_TOLERANCE: f32 = 5.0;

static ARABIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Arabic}").expect("arabic regex"));

/// 选出锚点落在（外扩后的）答案框内的片段，按阅读顺序无分隔拼接
pub fn collect_answer_text(fragments: &[TextFragment], answer_box: &Rectangle) -> String {
    let region = answer_box.expand(ANSWER_BOX_PADDING);

    let mut selected: Vec<(f32, f32, &str)> = fragments
        .iter()
        .filter_map(|fragment| {
            let (x, y) = fragment.to_reference_space();
            region
                .contains_point(x, y)
                .then_some((x, y, fragment.text.as_str()))
        })
        .collect();

    order_by_rows(&mut selected);
    selected.into_iter().map(|(_, _, text)| text).collect()
}

/// 先按行（纵坐标）再按行内阅读方向排序
fn order_by_rows(items: &mut Vec<(f32, f32, &str)>) {
    items.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut ordered = Vec::with_capacity(items.len());
    let mut row: Vec<(f32, f32, &str)> = Vec::new();
    let mut row_y = f32::NEG_INFINITY;

    for item in items.drain(..) {
        if !row.is_empty() && item.1 - row_y > ROW_TOLERANCE {
            order_row(&mut row);
            ordered.append(&mut row);
        }
        if row.is_empty() {
            row_y = item.1;
        }
        row.push(item);
    }
    order_row(&mut row);
    ordered.append(&mut row);

    *items = ordered;
}

/// 含阿拉伯文字的行从右往左读，其余行从左往右
fn order_row(row: &mut [(f32, f32, &str)]) {
    if row.iter().any(|(_, _, text)| ARABIC_RE.is_match(text)) {
        row.sort_by(|a, b| b.0.total_cmp(&a.0));
    } else {
        row.sort_by(|a, b| a.0.total_cmp(&b.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 以参考空间像素构造片段（文档空间 = 像素 / 2）
    fn at_px(text: &str, x: f32, y: f32) -> TextFragment {
        TextFragment::new(text, x / 2.0, y / 2.0)
    }

    #[test]
    fn selects_fragments_inside_padded_box() {
        let answer_box = Rectangle::new(100, 100, 200, 50);
        let fragments = vec![
            at_px("in", 150.0, 120.0),
            at_px("pad", 90.0, 160.0),
            at_px("far", 400.0, 120.0),
            at_px("above", 150.0, 80.0),
        ];
        assert_eq!(collect_answer_text(&fragments, &answer_box), "inpad");
    }

    #[test]
    fn orders_rows_then_columns() {
        let answer_box = Rectangle::new(0, 0, 500, 200);
        let fragments = vec![
            at_px("D", 300.0, 62.0),
            at_px("B", 200.0, 20.0),
            at_px("C", 100.0, 60.0),
            at_px("A", 50.0, 23.0),
        ];
        assert_eq!(collect_answer_text(&fragments, &answer_box), "ABCD");
    }

    #[test]
    fn rows_further_apart_than_tolerance_are_separate() {
        let answer_box = Rectangle::new(0, 0, 500, 200);
        let fragments = vec![at_px("second", 10.0, 36.0), at_px("first", 400.0, 30.0)];
        assert_eq!(collect_answer_text(&fragments, &answer_box), "firstsecond");
    }

    #[test]
    fn arabic_rows_read_right_to_left() {
        let answer_box = Rectangle::new(100, 600, 300, 40);
        let fragments = vec![
            at_px("ب", 160.0, 620.0),
            at_px("الإجابة", 360.0, 620.0),
            at_px("الصحيحة:", 240.0, 621.0),
        ];
        assert_eq!(
            collect_answer_text(&fragments, &answer_box),
            "الإجابةالصحيحة:ب"
        );
    }

    #[test]
    fn mixed_rows_keep_their_own_direction() {
        let answer_box = Rectangle::new(0, 0, 500, 200);
        let fragments = vec![
            at_px("answer", 200.0, 20.0),
            at_px("Correct", 50.0, 22.0),
            at_px("ج", 100.0, 60.0),
            at_px("الجواب", 300.0, 61.0),
        ];
        assert_eq!(
            collect_answer_text(&fragments, &answer_box),
            "Correctanswerالجوابج"
        );
    }

    #[test]
    fn no_fragments_yield_empty_text() {
        assert_eq!(collect_answer_text(&[], &Rectangle::new(0, 0, 10, 10)), "");
    }
}

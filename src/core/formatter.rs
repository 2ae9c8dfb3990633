use crate::domain::model::Selection;
use std::fmt::Write;

pub const CAMPAIGN_HASHTAG: &str = "サイゼリヤガチャ";
pub const CURRENCY_SUFFIX: &str = "円";

/// Renders a selection as reply text.
///
/// One `id: {icon}{name} {price}円` line per item, with ` (pre_id)` appended
/// when the item has one, then a blank line and the campaign hashtag.
pub fn format_reply(selection: &Selection) -> String {
    let mut buf = String::new();
    for item in &selection.items {
        // Writing into a String cannot fail.
        let _ = write!(
            buf,
            "{}: {}{} {}{}",
            item.id, item.icon, item.name, item.price, CURRENCY_SUFFIX
        );
        if !item.pre_id.is_empty() {
            let _ = write!(buf, " ({})", item.pre_id);
        }
        buf.push('\n');
    }
    buf.push('\n');
    buf.push('#');
    buf.push_str(CAMPAIGN_HASHTAG);
    buf
}

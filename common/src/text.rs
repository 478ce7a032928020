//! AI応答テキストの整形
//!
//! 上流のテキスト生成サービスが返すMarkdown風の文章を、
//! リッチ表示できないUI向けに変換する。
//!
//! - [`strip_markdown`]: 見出し・強調・絵文字を除去したプレーンテキスト
//! - [`clean_ai_response`]: 絵文字を残した軽量な整形テキスト
//! - [`format_ai_response_for_display`]: 見出し単位のアウトライン
//!
//! 構造の判定は正規表現によるベストエフォートの分類であり、
//! 汎用のMarkdownパーサーではない。

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 見出しが一つも無い場合のタイトル
pub const DEFAULT_TITLE: &str = "AI Insights";

/// 見出しとして扱う絵文字（閉じた集合）
///
/// 異体字セレクタ (U+FE0F) の有無はどちらも受け付ける。
pub const HEADER_EMOJIS: &[&str] = &[
    "🎯", "📊", "💡", "⚠", "✅", "🔍", "📈", "🌱", "♻", "🍎", "🥗", "💰", "📅",
];

/// 箇条書き記号の置換先
pub const BULLET_GLYPH: &str = "•";

fn emoji_pattern() -> String {
    let alternatives = HEADER_EMOJIS
        .iter()
        .map(|e| regex::escape(e))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"(?:{})\x{{FE0F}}?", alternatives)
}

lazy_static! {
    // 行頭（空白・見出し絵文字の後ろも含む）の `#`×1〜6 + 空白。`## ##` のような重ねも一度に取る
    static ref HEADING_MARKER_RE: Regex = Regex::new(&format!(
        r"(?m)^([^\S\n]*(?:{}[^\S\n]*)*)(?:#{{1,6}}(?:[^\S\n]+|$))+",
        emoji_pattern()
    ))
    .unwrap();
    static ref BOLD_RE: Regex = Regex::new(r"\*\*(.*?)\*\*").unwrap();
    static ref ITALIC_RE: Regex = Regex::new(r"\*(.*?)\*").unwrap();
    static ref BULLET_MARKER_RE: Regex = Regex::new(r"(?m)^[^\S\n]*[-*+][^\S\n]+").unwrap();
    static ref LEADING_EMOJI_RE: Regex =
        Regex::new(&format!(r"(?m)^[^\S\n]*(?:{}[^\S\n]*)+", emoji_pattern())).unwrap();
    static ref ANY_EMOJI_RE: Regex = Regex::new(&format!(r"({})\s*", emoji_pattern())).unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();

    // 行単位（trim済みの1行）で使う判定
    static ref HEADING_LINE_RE: Regex = Regex::new(r"^#{1,6}\s").unwrap();
    static ref HEADING_STRIP_RE: Regex = Regex::new(r"^#{1,6}\s+").unwrap();
    static ref EMOJI_PREFIX_RE: Regex = Regex::new(&format!(r"^{}\s*", emoji_pattern())).unwrap();
    static ref BULLET_LINE_RE: Regex = Regex::new(r"^[-*+]\s").unwrap();
    static ref BULLET_STRIP_RE: Regex = Regex::new(r"^[-*+]\s+").unwrap();
    static ref LABEL_VALUE_RE: Regex = Regex::new(r"^[A-Za-z0-9_\s]+:\s*[0-9]").unwrap();
}

/// 各行の見出し記号を除去する（行頭の見出し絵文字は残す）
///
/// `## 🎯 ## x` のように記号と絵文字が交互に並ぶ場合も残らないよう、変化がなくなるまで繰り返す。
fn strip_heading_markers(text: &str) -> String {
    let mut text = text.to_string();
    loop {
        let next = HEADING_MARKER_RE.replace_all(&text, "${1}").into_owned();
        if next == text {
            return text;
        }
        text = next;
    }
}

/// 見出し記号と行頭の見出し絵文字を除去する
fn strip_line_prefixes(text: &str) -> String {
    let text = strip_heading_markers(text);
    LEADING_EMOJI_RE.replace_all(&text, "").into_owned()
}

fn replace_bullets(text: &str) -> String {
    let bullet = format!("{} ", BULLET_GLYPH);
    BULLET_MARKER_RE
        .replace_all(text, bullet.as_str())
        .into_owned()
}

/// 強調記号を外す
///
/// 改行を畳んだ後の1行に対して使う。`*` は左から2つずつ対になるので、残るのは高々1つ。
fn unwrap_emphasis(text: &str) -> String {
    let text = BOLD_RE.replace_all(text, "$1");
    ITALIC_RE.replace_all(&text, "$1").into_owned()
}

/// 空白類（改行を含む）を単一スペースに畳んで前後をtrim
///
/// 改行も畳まれるため、3行以上の空行を2行に詰める処理は
/// ここでは結果に影響しない。
fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Markdown記法と見出し絵文字を除去したプレーンテキストを返す
///
/// 強調を外した結果が見出し記号で始まる場合（`**#** x` など）もそれを除去する。
///
/// # Examples
/// ```
/// use food_waste_common::text::strip_markdown;
///
/// assert_eq!(strip_markdown("## Tips\n- **Freeze** bread"), "Tips • Freeze bread");
/// ```
pub fn strip_markdown(text: &str) -> String {
    let text = replace_bullets(&strip_line_prefixes(text));
    let text = unwrap_emphasis(&collapse_whitespace(&text));
    collapse_whitespace(&strip_line_prefixes(&text))
}

/// AI応答を整形する（見出し絵文字は残し、直後のスペースを1つに揃える）
pub fn clean_ai_response(text: &str) -> String {
    let text = replace_bullets(&strip_heading_markers(text));
    let text = unwrap_emphasis(&collapse_whitespace(&text));
    let text = strip_heading_markers(&text);
    let text = ANY_EMOJI_RE.replace_all(&text, "${1} ");
    collapse_whitespace(&text)
}

/// アウトラインの1セクション
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub content: String,
    pub items: Vec<String>,
}

impl Section {
    fn new(heading: String) -> Self {
        Self {
            heading,
            ..Default::default()
        }
    }

    fn push_content(&mut self, line: &str) {
        if !self.content.is_empty() {
            self.content.push(' ');
        }
        self.content.push_str(line);
    }
}

/// 表示用に構造化したAI応答
///
/// タイトルは最初の見出しで確定する。見出しが無ければ [`DEFAULT_TITLE`]。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedDocument {
    title: Option<String>,
    pub sections: Vec<Section>,
}

impl FormattedDocument {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// `{ "title", "sections" }` 形式の整形済みJSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Serialize)]
struct DocumentWire<'a> {
    title: &'a str,
    sections: &'a [Section],
}

impl Serialize for FormattedDocument {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DocumentWire {
            title: self.title(),
            sections: &self.sections,
        }
        .serialize(serializer)
    }
}

/// 1行の分類結果
#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Heading(String),
    Item(&'a str),
    Text(&'a str),
}

fn classify_line(line: &str) -> LineKind<'_> {
    if EMOJI_PREFIX_RE.is_match(line) || HEADING_LINE_RE.is_match(line) {
        let heading = EMOJI_PREFIX_RE.replace(line, "");
        let heading = HEADING_STRIP_RE.replace(&heading, "");
        return LineKind::Heading(heading.trim().to_string());
    }

    if BULLET_LINE_RE.is_match(line) || LABEL_VALUE_RE.is_match(line) {
        let item = match BULLET_STRIP_RE.find(line) {
            Some(m) => &line[m.end()..],
            None => line,
        };
        return LineKind::Item(item);
    }

    LineKind::Text(line)
}

/// AI応答を見出し単位のアウトラインに変換する
///
/// 1. 見出し行（見出し絵文字で始まる / `#`×1〜6 + 空白）で新しいセクションを開く
/// 2. 箇条書き行・`ラベル: 数値` 行はセクションの `items` に追加
/// 3. それ以外の行は `content` にスペース区切りで連結
///
/// 最初の見出しより前の行は破棄される。
///
/// # Examples
/// ```
/// use food_waste_common::text::format_ai_response_for_display;
///
/// let doc = format_ai_response_for_display("## Tips\n- save money");
/// assert_eq!(doc.title(), "Tips");
/// assert_eq!(doc.sections[0].items, vec!["save money"]);
/// ```
pub fn format_ai_response_for_display(text: &str) -> FormattedDocument {
    let mut document = FormattedDocument::default();
    let mut current: Option<Section> = None;

    for line in text.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        match classify_line(line) {
            LineKind::Heading(heading) => {
                if let Some(section) = current.take() {
                    document.sections.push(section);
                }
                if document.title.is_none() {
                    document.title = Some(heading.clone());
                }
                current = Some(Section::new(heading));
            }
            LineKind::Item(item) => match current.as_mut() {
                Some(section) => section.items.push(item.to_string()),
                // 見出しが出る前の行は捨てる
                None => {}
            },
            LineKind::Text(text) => match current.as_mut() {
                Some(section) => section.push_content(text),
                None => {}
            },
        }
    }

    if let Some(section) = current {
        document.sections.push(section);
    }

    document
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // strip_markdown テスト
    // =============================================

    #[test]
    fn test_strip_markdown_empty() {
        assert_eq!(strip_markdown(""), "");
    }

    #[test]
    fn test_strip_markdown_headings() {
        assert_eq!(strip_markdown("# Title\n###### Deep"), "Title Deep");
    }

    #[test]
    fn test_strip_markdown_emphasis() {
        assert_eq!(strip_markdown("Use **leftover** rice *today*"), "Use leftover rice today");
        assert_eq!(strip_markdown("***both***"), "both");
    }

    #[test]
    fn test_strip_markdown_bullets() {
        assert_eq!(
            strip_markdown("- apples\n* pears\n+ plums"),
            "• apples • pears • plums"
        );
    }

    #[test]
    fn test_strip_markdown_removes_leading_emoji() {
        assert_eq!(strip_markdown("🎯 Goals\n♻️ Recycle"), "Goals Recycle");
        // 行頭以外の絵文字は残る
        assert_eq!(strip_markdown("Done ✅"), "Done ✅");
    }

    #[test]
    fn test_strip_markdown_collapses_whitespace() {
        let out = strip_markdown("  line one\n\n\n\nline   two\t\tend  ");
        assert_eq!(out, "line one line two end");
        assert!(!out.contains("  "));
        assert!(!out.contains('\n'));
    }

    #[test]
    fn test_strip_markdown_realistic_response() {
        let input = "## 📊 Summary\n\n**Total items:** 12\n\n💡 Tips\n- Store *berries* dry\n- Freeze bread";
        let out = strip_markdown(input);
        assert!(!out.contains('#'));
        assert!(!out.contains('*'));
        assert!(!out.contains("  "));
        assert_eq!(out, "Summary Total items: 12 Tips • Store berries dry • Freeze bread");
    }

    #[test]
    fn test_strip_markdown_heading_variants() {
        assert_eq!(strip_markdown("  ## Indented heading"), "Indented heading");
        assert_eq!(strip_markdown("🎯 ## Goal"), "Goal");
        assert_eq!(strip_markdown("## ## Double"), "Double");
        assert_eq!(strip_markdown("## 🎯 ## Mixed"), "Mixed");
        assert_eq!(strip_markdown("Intro\n\t### Tabbed"), "Intro Tabbed");
        // 強調を外した結果が見出し記号になる場合
        assert_eq!(strip_markdown("**#** bold hash"), "bold hash");
        // `#` 7個以上・空白なしは見出しではない
        assert_eq!(strip_markdown("####### seven"), "####### seven");
        assert_eq!(strip_markdown("#hashtag"), "#hashtag");
    }

    #[test]
    fn test_strip_markdown_bullet_before_italic() {
        assert_eq!(strip_markdown("* apples *and* pears"), "• apples and pears");
        assert_eq!(strip_markdown("  - indented item"), "• indented item");
    }

    #[test]
    fn test_strip_markdown_output_is_always_plain() {
        let inputs = [
            "",
            "   ",
            "  ## Indented heading",
            "🎯 ## Goal",
            "## ## Double",
            "## 🎯 ## Mixed",
            "💡## Tip",
            "\u{00A0}## nbsp indent",
            "##\u{3000}ideographic space",
            "\r\n## crlf\r\n- item\r\n",
            "#\nafter bare hash",
            "**#** bold hash",
            "** ## spaced bold **",
            "- ## bullet heading",
            "*\n*",
            "*a\nb*",
            "* apples *and* pears",
            "unpaired * star",
            "a ** b",
            "***",
            "****",
            "*a* *b* *c",
            "line\u{2028}## separator",
            "tabs\t\tand\u{2003}em\u{2003}\u{2003}spaces",
        ];

        for input in inputs {
            let out = strip_markdown(input);
            for line in out.lines() {
                assert!(!HEADING_LINE_RE.is_match(line), "{:?} -> {:?}", input, out);
            }
            assert!(out.matches('*').count() <= 1, "{:?} -> {:?}", input, out);
            assert!(!out.contains("  "), "{:?} -> {:?}", input, out);
            assert_eq!(out, out.trim(), "{:?} -> {:?}", input, out);
        }
    }

    // =============================================
    // clean_ai_response テスト
    // =============================================

    #[test]
    fn test_clean_ai_response_empty() {
        assert_eq!(clean_ai_response(""), "");
    }

    #[test]
    fn test_clean_ai_response_keeps_emoji_with_single_space() {
        assert_eq!(clean_ai_response("🎯Goals"), "🎯 Goals");
        assert_eq!(clean_ai_response("⚠️    Expiring soon"), "⚠️ Expiring soon");
        assert_eq!(clean_ai_response("All good ✅"), "All good ✅");
    }

    #[test]
    fn test_clean_ai_response_heading_after_emoji() {
        assert_eq!(clean_ai_response("🎯 ## Goal"), "🎯 Goal");
        assert_eq!(clean_ai_response("  ## ## Double"), "Double");
    }

    #[test]
    fn test_clean_ai_response_markup() {
        assert_eq!(
            clean_ai_response("### 💡 **Tip**\n- compost peels"),
            "💡 Tip • compost peels"
        );
    }

    // =============================================
    // format_ai_response_for_display テスト
    // =============================================

    #[test]
    fn test_format_empty() {
        let doc = format_ai_response_for_display("");
        assert_eq!(doc.title(), DEFAULT_TITLE);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_format_without_heading_drops_everything() {
        let doc = format_ai_response_for_display("Plain line with no heading");
        assert_eq!(doc.title(), "AI Insights");
        assert!(doc.sections.is_empty());

        let doc = format_ai_response_for_display("- orphan item\nTotal items: 5");
        assert!(doc.sections.is_empty());
    }

    #[test]
    fn test_format_bullets() {
        let doc = format_ai_response_for_display("## Tips\n- save money\n- reduce waste");
        assert_eq!(doc.title(), "Tips");
        assert_eq!(
            doc.sections,
            vec![Section {
                heading: "Tips".into(),
                content: String::new(),
                items: vec!["save money".into(), "reduce waste".into()],
            }]
        );
    }

    #[test]
    fn test_format_two_sections() {
        let doc = format_ai_response_for_display("## A\nfoo\n## B\nbar");
        assert_eq!(doc.title(), "A");
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].heading, "A");
        assert_eq!(doc.sections[0].content, "foo");
        assert_eq!(doc.sections[1].heading, "B");
        assert_eq!(doc.sections[1].content, "bar");
    }

    #[test]
    fn test_format_emoji_heading_and_label_items() {
        let input = "Intro that is dropped\n📊 Inventory Overview\nTotal items: 5\nExpiring soon: 2\nYou are doing well.\n  Keep it up.  \n💡 Tips\n* freeze bread";
        let doc = format_ai_response_for_display(input);
        assert_eq!(doc.title(), "Inventory Overview");
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].items, vec!["Total items: 5", "Expiring soon: 2"]);
        assert_eq!(doc.sections[0].content, "You are doing well. Keep it up.");
        assert_eq!(doc.sections[1].heading, "Tips");
        assert_eq!(doc.sections[1].items, vec!["freeze bread"]);
    }

    #[test]
    fn test_format_title_is_first_heading_only() {
        let doc = format_ai_response_for_display("# AI Insights\n## Second");
        assert_eq!(doc.title(), "AI Insights");
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].heading, "AI Insights");
    }

    #[test]
    fn test_format_hash_without_space_is_not_heading() {
        let doc = format_ai_response_for_display("## Notes\n#hashtag text\n####### seven");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].content, "#hashtag text ####### seven");
    }

    #[test]
    fn test_format_bold_line_is_not_item() {
        let doc = format_ai_response_for_display("## Notes\n**Important** stuff");
        assert!(doc.sections[0].items.is_empty());
        assert_eq!(doc.sections[0].content, "**Important** stuff");
    }

    #[test]
    fn test_format_handles_crlf() {
        let doc = format_ai_response_for_display("## A\r\nfoo\r\n\r\n- bar\r\n");
        assert_eq!(doc.sections[0].content, "foo");
        assert_eq!(doc.sections[0].items, vec!["bar"]);
    }

    #[test]
    fn test_format_serializes_default_title() {
        let json = serde_json::to_value(format_ai_response_for_display("")).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "AI Insights", "sections": [] }));
    }

    #[test]
    fn test_to_json() {
        let json = format_ai_response_for_display("## Tips\n- freeze bread")
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Tips");
        assert_eq!(value["sections"][0]["items"][0], "freeze bread");
    }
}

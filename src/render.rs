/// HTML card fragments for the page carousels
use crate::video::VideoEntry;
use serde::{Deserialize, Serialize};

/// Card style
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CardVariant {
    /// Compact video card
    Video,
    /// Highlight card with a white play glyph
    Highlight,
}

impl CardVariant {
    fn class_prefix(self) -> &'static str {
        match self {
            CardVariant::Video => "video-card",
            CardVariant::Highlight => "highlight-card",
        }
    }

    fn glyph_fill(self) -> &'static str {
        match self {
            CardVariant::Video => "",
            CardVariant::Highlight => r##" fill="#fff""##,
        }
    }
}

/// Escape text for use in HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render a single card. URL, thumbnail and duration are inserted as-is.
pub fn render_card(video: &VideoEntry, variant: CardVariant) -> String {
    let class = variant.class_prefix();
    format!(
        r#"      <a href="{url}" target="_blank" class="{class}">
        <div class="{class}-thumb">
          <img src="{thumbnail}" alt="">
          <div class="play-btn"><svg viewBox="0 0 16 16"{fill}><polygon points="5,3 13,8 5,13"/></svg></div>
          <span class="video-duration">{duration}</span>
        </div>
        <div class="{class}-title">{title}</div>
      </a>"#,
        url = video.url,
        class = class,
        thumbnail = video.thumbnail,
        fill = variant.glyph_fill(),
        duration = video.duration,
        title = escape_html(&video.title),
    )
}

/// Render all cards, one per line block. Empty input gives an empty fragment.
pub fn render_fragment(videos: &[VideoEntry], variant: CardVariant) -> String {
    videos
        .iter()
        .map(|video| render_card(video, variant))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::watch_url;

    fn video(id: &str, title: &str) -> VideoEntry {
        VideoEntry {
            id: id.to_string(),
            title: title.to_string(),
            thumbnail: format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", id),
            channel: None,
            published: None,
            duration: "12:34".to_string(),
            url: watch_url(id),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Q&A <live> \"now\" it's"), "Q&amp;A &lt;live&gt; &quot;now&quot; it&#x27;s");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_video_card_contents() {
        let card = render_card(&video("abc", "Driver reacts to Q3"), CardVariant::Video);

        assert!(card.contains(r#"<a href="https://www.youtube.com/watch?v=abc" target="_blank" class="video-card">"#));
        assert!(card.contains(r#"<div class="video-card-thumb">"#));
        assert!(card.contains(r#"<img src="https://i.ytimg.com/vi/abc/hqdefault.jpg" alt="">"#));
        assert!(card.contains(r#"<svg viewBox="0 0 16 16"><polygon"#));
        assert!(card.contains(r#"<span class="video-duration">12:34</span>"#));
        assert!(card.contains(r#"<div class="video-card-title">Driver reacts to Q3</div>"#));
    }

    #[test]
    fn test_highlight_variant_differs_only_in_style() {
        let v = video("xyz", "Fastest lap ever");
        let compact = render_card(&v, CardVariant::Video);
        let highlight = render_card(&v, CardVariant::Highlight);

        assert!(highlight.contains(r#"class="highlight-card""#));
        assert!(highlight.contains(r##"<svg viewBox="0 0 16 16" fill="#fff">"##));

        let normalized = highlight
            .replace("highlight-card", "video-card")
            .replace(r##" fill="#fff""##, "");
        assert_eq!(normalized, compact);
    }

    #[test]
    fn test_title_is_escaped() {
        let fragment = render_fragment(&[video("a", "<script>alert('x')</script>")], CardVariant::Video);
        assert!(!fragment.contains("<script>"));
        assert!(fragment.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_fragment_joins_cards() {
        let videos = vec![video("a", "one"), video("b", "two"), video("c", "three")];
        let fragment = render_fragment(&videos, CardVariant::Highlight);

        assert_eq!(fragment.matches("<a href=").count(), 3);
        assert!(fragment.starts_with("      <a href=\"https://www.youtube.com/watch?v=a\""));
        assert!(fragment.ends_with("</a>"));
    }

    #[test]
    fn test_empty_fragment() {
        assert_eq!(render_fragment(&[], CardVariant::Video), "");
    }

    #[test]
    fn test_variant_serde_names() {
        assert_eq!(serde_json::to_string(&CardVariant::Highlight).unwrap(), "\"highlight\"");
        let parsed: CardVariant = serde_json::from_str("\"video\"").unwrap();
        assert_eq!(parsed, CardVariant::Video);
    }
}

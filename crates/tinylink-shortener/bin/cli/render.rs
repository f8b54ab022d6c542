use crate::cli::OutputFormat;
use askama::Template;
use serde_json::json;
use tinylink_shortener::UrlRecord;

#[derive(Template)]
#[template(path = "urls.xml", escape = "html")]
struct UrlsXml<'a> {
    urls: &'a [String],
}

#[derive(Template)]
#[template(path = "urls.html")]
struct UrlsHtml<'a> {
    urls: &'a [String],
}

/// Renders the short URLs of a shortened link, primary first.
pub fn render_urls(urls: &[String], format: OutputFormat) -> anyhow::Result<String> {
    let rendered = match format {
        OutputFormat::Text => urls.join("\n"),
        OutputFormat::Json => serde_json::to_string(urls)?,
        OutputFormat::Xml => UrlsXml { urls }.render()?,
        OutputFormat::Html => UrlsHtml { urls }.render()?,
    };
    Ok(rendered)
}

/// Renders stored records as a pretty printed `{"results": [...]}` document.
pub fn render_records(records: &[UrlRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&json!({ "results": records }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> Vec<String> {
        vec![
            "http://localhost/bc".to_string(),
            "http://localhost/My&Alias".to_string(),
        ]
    }

    #[test]
    fn renders_text_one_url_per_line() {
        assert_eq!(
            render_urls(&urls(), OutputFormat::Text).unwrap(),
            "http://localhost/bc\nhttp://localhost/My&Alias"
        );
    }

    #[test]
    fn renders_json_array() {
        assert_eq!(
            render_urls(&urls(), OutputFormat::Json).unwrap(),
            r#"["http://localhost/bc","http://localhost/My&Alias"]"#
        );
    }

    #[test]
    fn renders_xml_with_escaped_entities() {
        let xml = render_urls(&urls(), OutputFormat::Xml).unwrap();
        assert_eq!(
            xml.trim_end(),
            [
                r#"<?xml version="1.0"?>"#,
                "<response>",
                "  <url>http://localhost/bc</url>",
                "  <url>http://localhost/My&amp;Alias</url>",
                "</response>",
            ]
            .join("\n")
        );
    }

    #[test]
    fn renders_html_anchors() {
        let html = render_urls(&urls()[..1], OutputFormat::Html).unwrap();
        assert_eq!(
            html.trim_end(),
            r#"<a href="http://localhost/bc">http://localhost/bc</a><br/>"#
        );
    }

    #[test]
    fn renders_html_one_anchor_per_line_with_escaping() {
        let html = render_urls(&urls(), OutputFormat::Html).unwrap();
        let lines: Vec<&str> = html.trim_end().lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"<a href="http://localhost/bc">http://localhost/bc</a><br/>"#,
                r#"<a href="http://localhost/My&amp;Alias">http://localhost/My&amp;Alias</a><br/>"#,
            ]
        );
    }

    #[test]
    fn markup_in_urls_is_escaped() {
        let urls = vec!["http://localhost/<b>".to_string()];
        for format in [OutputFormat::Xml, OutputFormat::Html] {
            let rendered = render_urls(&urls, format).unwrap();
            assert!(rendered.contains("http://localhost/&lt;b&gt;"), "{rendered}");
            assert!(!rendered.contains("<b>"), "{rendered}");
        }
    }

    #[test]
    fn renders_empty_record_list() {
        let rendered = render_records(&[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value, json!({ "results": [] }));
    }
}

//! Markdown / HTML fragments per ad format.

use std::fmt::Write;

use inkslot_lexicon::Lexicon;
use inkslot_types::{AdCreative, AdFormat};

const DEFAULT_CTA: &str = "Learn more";
const SPONSORED: &str = "Sponsored";

fn sponsor_line(ad: &AdCreative) -> String {
    if ad.content.advertiser.trim().is_empty() {
        SPONSORED.to_string()
    } else {
        format!("{SPONSORED} by {}", ad.content.advertiser.trim())
    }
}

fn cta(ad: &AdCreative) -> &str {
    ad.content
        .cta_text
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_CTA)
}

/// Escape text for HTML elements and double- or single-quoted attributes.
fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn banner(ad: &AdCreative) -> String {
    let href = escape_html(&ad.cta_url);
    let title = escape_html(&ad.content.title);
    let mut out = String::from("<div align=\"center\">\n");
    match ad.content.image_url.as_deref() {
        Some(src) if !src.is_empty() => {
            let _ = writeln!(
                out,
                "<a href=\"{}\"><img src=\"{}\" alt=\"{}\" /></a>",
                href,
                escape_html(src),
                title
            );
        }
        _ => {
            let _ = writeln!(out, "<a href=\"{href}\"><strong>{title}</strong></a>");
        }
    }
    let _ = write!(out, "<br/><sub>{}</sub>\n</div>", escape_html(&sponsor_line(ad)));
    out
}

fn text(ad: &AdCreative) -> String {
    format!(
        "> **{}:** [{}]({}) {}",
        SPONSORED, ad.content.title, ad.cta_url, ad.content.body
    )
    .trim_end()
    .to_string()
}

fn card(ad: &AdCreative) -> String {
    let mut out = String::from("<table><tr><td>\n\n");
    let _ = writeln!(out, "**{}**\n", escape_html(&ad.content.title));
    if !ad.content.body.is_empty() {
        let _ = writeln!(out, "{}\n", escape_html(&ad.content.body));
    }
    let _ = writeln!(out, "[{}]({})\n", cta(ad), ad.cta_url);
    let _ = write!(
        out,
        "<sub>{}</sub>\n\n</td></tr></table>",
        escape_html(&sponsor_line(ad))
    );
    out
}

fn native(ad: &AdCreative, section: &str, lexicon: &Lexicon) -> String {
    if lexicon.is_resource_title(section) {
        format!(
            "- **[{}]({})**: {} _({})_",
            ad.content.title,
            ad.cta_url,
            ad.content.body,
            SPONSORED.to_lowercase()
        )
    } else {
        format!(
            "> **Related:** {} [{}]({}) _({})_",
            ad.content.body,
            cta(ad),
            ad.cta_url,
            SPONSORED.to_lowercase()
        )
    }
}

/// Render `ad` for insertion into `section`.
///
/// Native ads read as a list entry under tool or resource sections and as a
/// callout anywhere else.
pub fn render_ad(ad: &AdCreative, section: &str, lexicon: &Lexicon) -> String {
    match ad.format {
        AdFormat::Banner => banner(ad),
        AdFormat::Text => text(ad),
        AdFormat::Card => card(ad),
        AdFormat::Native => native(ad, section, lexicon),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkslot_types::AdContent;

    fn ad(format: AdFormat) -> AdCreative {
        AdCreative {
            id: "ad-1".into(),
            format,
            content: AdContent {
                title: "Fast CI".into(),
                body: "Builds in seconds.".into(),
                advertiser: "Acme".into(),
                image_url: None,
                cta_text: None,
            },
            cta_url: "https://acme.test".into(),
            targeting: Default::default(),
            performance: Default::default(),
        }
    }

    #[test]
    fn text_ad_is_a_quote_line() {
        let out = render_ad(&ad(AdFormat::Text), "Usage", &Lexicon::builtin());
        assert_eq!(
            out,
            "> **Sponsored:** [Fast CI](https://acme.test) Builds in seconds."
        );
    }

    #[test]
    fn native_ad_follows_section_wording() {
        let lex = Lexicon::builtin();
        let listed = render_ad(&ad(AdFormat::Native), "Related Tools", &lex);
        assert!(listed.starts_with("- **[Fast CI](https://acme.test)**"));
        let callout = render_ad(&ad(AdFormat::Native), "Usage", &lex);
        assert!(callout.starts_with("> **Related:**"));
        assert!(callout.contains("[Learn more](https://acme.test)"));
    }

    #[test]
    fn banner_without_image_falls_back_to_link() {
        let out = render_ad(&ad(AdFormat::Banner), "Usage", &Lexicon::builtin());
        assert!(out.contains("<strong>Fast CI</strong>"));
        assert!(out.contains("Sponsored by Acme"));
        assert!(out.ends_with("</div>"));
    }

    #[test]
    fn banner_escapes_markup_in_attributes() {
        let mut a = ad(AdFormat::Banner);
        a.content.title = "Say \"hi\" <b>".into();
        a.content.image_url = Some("https://img.test/a.png?x=\"y\"".into());
        a.cta_url = "https://acme.test/?a=1&b=2".into();
        let out = render_ad(&a, "Usage", &Lexicon::builtin());
        assert!(out.contains("alt=\"Say &quot;hi&quot; &lt;b&gt;\""));
        assert!(out.contains("src=\"https://img.test/a.png?x=&quot;y&quot;\""));
        assert!(out.contains("href=\"https://acme.test/?a=1&amp;b=2\""));
        assert!(!out.contains("<b>"));
    }

    #[test]
    fn card_escapes_title_and_body() {
        let mut a = ad(AdFormat::Card);
        a.content.title = "</td></tr></table><script>".into();
        a.content.body = "1 < 2".into();
        let out = render_ad(&a, "Usage", &Lexicon::builtin());
        assert!(out.contains("**&lt;/td&gt;&lt;/tr&gt;&lt;/table&gt;&lt;script&gt;**"));
        assert!(out.contains("1 &lt; 2"));
        assert_eq!(out.matches("</table>").count(), 1);
    }

    #[test]
    fn card_uses_cta_text() {
        let mut a = ad(AdFormat::Card);
        a.content.cta_text = Some("Try it".into());
        let out = render_ad(&a, "Usage", &Lexicon::builtin());
        assert!(out.contains("[Try it](https://acme.test)"));
    }
}

//! Presentation overrides applied before printing.

/// Forces Docusaurus-style sites into their light theme.
pub const LIGHT_THEME_SCRIPT: &str =
    "document.documentElement.setAttribute('data-theme', 'light')";

/// Black-on-white code blocks with syntax colouring and glow removed.
pub const PRINTABLE_CODE_CSS: &str = r#"
pre,
code,
pre code {
  background: #ffffff !important;
  color: #000000 !important;
}

.prism-code,
.codeBlockContainer,
.codeBlockContent,
.theme-code-block,
div[class*="codeBlock"],
div[class*="prism"] {
  background: #ffffff !important;
  color: #000000 !important;
}

pre code span,
pre code span[class],
code span,
code span[class],
.token,
.token * {
  color: #000000 !important;
  background: transparent !important;
  text-shadow: none !important;
}

pre code {
  filter: none !important;
}

pre {
  box-shadow: none !important;
  border: 1px solid #dddddd !important;
}

code, pre {
  font-family: Menlo, Consolas, Monaco, "Courier New", monospace !important;
  font-size: 10pt !important;
}
"#;

/// Script appending `css` to the document head as a `<style>` element.
pub fn style_tag_script(css: &str) -> String {
    // serde_json string encoding doubles as JS string-literal escaping
    let literal = serde_json::Value::String(css.to_string()).to_string();
    format!(
        "(() => {{ const style = document.createElement('style'); \
         style.textContent = {literal}; \
         (document.head || document.documentElement).appendChild(style); \
         return true; }})()"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_covers_code_and_tokens() {
        assert!(PRINTABLE_CODE_CSS.contains("text-shadow: none"));
        assert!(PRINTABLE_CODE_CSS.contains("font-size: 10pt"));
        assert!(PRINTABLE_CODE_CSS.contains(".token"));
    }

    #[test]
    fn style_script_escapes_css() {
        let script = style_tag_script("a::before { content: \"x\"; }\n");
        assert!(script.contains(r#"style.textContent = "a::before { content: \"x\"; }\n";"#));
    }
}

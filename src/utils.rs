use std::path::Path;

use indicatif::ProgressStyle;
use regex::Regex;

pub fn pb_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
        .unwrap()
}

/// 由逗号分隔的后缀列表构建不区分大小写的后缀正则
pub fn suffix_regex(suffix: &str) -> Result<Regex, regex::Error> {
    let alternatives = suffix.split(',').map(|s| regex::escape(s.trim())).collect::<Vec<_>>().join("|");
    Regex::new(&format!("(?i)^({})$", alternatives))
}

/// 检查文件后缀是否匹配
pub fn has_suffix(path: impl AsRef<Path>, re_suf: &Regex) -> bool {
    path.as_ref().extension().is_some_and(|ext| re_suf.is_match(&ext.to_string_lossy()))
}

/// 转义 HTML 特殊字符
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_match() {
        let re = suffix_regex("png,jpg,jpeg").unwrap();
        assert!(has_suffix("a/COVID-1.PNG", &re));
        assert!(has_suffix("x.jpeg", &re));
        assert!(!has_suffix("x.jpegx", &re));
        assert!(!has_suffix("x.txt", &re));
        assert!(!has_suffix("png", &re));
    }

    #[test]
    fn escape() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}

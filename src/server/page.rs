use std::fmt::Write;

use crate::db::ConditionCount;
use crate::ranking::Ranking;
use crate::utils::escape_html;

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2rem; color: #222; }
.caption { color: #666; }
.grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; }
.tile img, .query img { width: 256px; }
.notice { color: #a15c00; }
.error { color: #b00020; }
form { margin-bottom: 1rem; }
table { border-collapse: collapse; }
td, th { border: 1px solid #ccc; padding: 0.25rem 0.75rem; }
"#;

/// 单个结果展示块 `(图片地址, 分数, 病症标签)`
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub image_url: String,
    pub score: f32,
    pub condition: String,
}

/// 将排序结果转换为展示块，图片从 `/images` 下读取
pub fn tiles(ranking: &Ranking) -> Vec<Tile> {
    ranking
        .top
        .iter()
        .map(|r| Tile {
            image_url: format!("/images/{}", urlencoding::encode(&r.filename)),
            score: r.score,
            condition: r.condition.clone(),
        })
        .collect()
}

/// 一次搜索的展示内容
pub struct ResultsView<'a> {
    /// 上传的查询图片地址
    pub query_image: Option<String>,
    pub query_text: Option<&'a str>,
    pub ranking: &'a Ranking,
    pub notice: Option<&'a str>,
}

/// 渲染完整页面，`body` 为搜索结果或错误信息
pub fn render_page(body: &str, counts: &[ConditionCount]) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Lungs Abnormality Detection</title>
<style>{STYLE}</style>
</head>
<body>
<h1>LungsX-RayImage - Multimodal Search</h1>
<p class="caption">Search public 'lungs abnormality' dataset</p>
<form action="/search" method="post" enctype="multipart/form-data">
<label>Search with an image: <input type="file" name="file" accept=".png,.jpg,.jpeg"></label>
<button type="submit">Search</button>
</form>
<form action="/search" method="post" enctype="multipart/form-data">
<label>Search with text: <input type="text" name="text"></label>
<button type="submit">Search</button>
</form>
{body}
{analytics}
</body>
</html>
"#,
        analytics = render_analytics(counts),
    );
    html
}

pub fn render_results(view: &ResultsView) -> String {
    let mut html = String::new();

    if let Some(url) = &view.query_image {
        let _ = write!(html, r#"<div class="query"><img src="{}" alt="query image"></div>"#, escape_html(url));
    }
    if let Some(text) = view.query_text {
        let _ = write!(html, "<p>Query: {}</p>", escape_html(text));
    }
    if let Some(notice) = view.notice {
        let _ = write!(html, r#"<p class="notice">{}</p>"#, escape_html(notice));
    }

    html.push_str("<h2>Search Results:</h2>\n<div class=\"grid\">\n");
    for tile in tiles(view.ranking) {
        let _ = writeln!(
            html,
            r#"<div class="tile"><img src="{url}" alt="{condition}"><p>Score: {score:.4}</p><p>condition: {condition}</p></div>"#,
            url = escape_html(&tile.image_url),
            score = tile.score,
            condition = escape_html(&tile.condition),
        );
    }
    html.push_str("</div>\n");

    if let Some(rec) = &view.ranking.recommendation {
        let _ = write!(
            html,
            "<h2>Recommendation and condition</h2>\n<p>{}</p>\n<p>Disclaimer: {}</p>\n",
            escape_html(&rec.condition),
            escape_html(&rec.disclaimer),
        );
    }

    html
}

pub fn render_error(message: &str) -> String {
    format!(r#"<p class="error">{}</p>"#, escape_html(message))
}

fn render_analytics(counts: &[ConditionCount]) -> String {
    let total: i64 = counts.iter().map(|c| c.count).sum();
    let mut html = String::from("<h2>Dataset Analytics</h2>\n");
    let _ = writeln!(html, "<p>Total images: {}</p>", total);
    html.push_str("<table>\n<tr><th>condition</th><th>images</th></tr>\n");
    for c in counts {
        let _ = writeln!(html, "<tr><td>{}</td><td>{}</td></tr>", escape_html(&c.condition), c.count);
    }
    html.push_str("</table>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::{SearchResult, rank_available};

    fn ranking() -> Ranking {
        let results = vec![
            SearchResult { filename: "COVID 1.png".into(), condition: "COVID".into(), score: 0.9 },
            SearchResult { filename: "NORMAL-2.png".into(), condition: "<NORMAL>".into(), score: 0.8 },
        ];
        rank_available(&results, 5)
    }

    #[test]
    fn tiles_keep_order() {
        let tiles = tiles(&ranking());
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0].image_url, "/images/COVID%201.png");
        assert_eq!(tiles[0].score, 0.9);
        assert_eq!(tiles[1].condition, "<NORMAL>");
    }

    #[test]
    fn results_escaped_with_recommendation() {
        let ranking = ranking();
        let html = render_results(&ResultsView {
            query_image: None,
            query_text: Some("<b>covid</b>"),
            ranking: &ranking,
            notice: Some("not enough"),
        });
        assert!(html.contains("&lt;b&gt;covid&lt;/b&gt;"));
        assert!(html.contains("&lt;NORMAL&gt;"));
        assert!(html.contains("Recommendation and condition"));
        assert!(html.contains("Disclaimer: "));
        assert!(html.contains(r#"class="notice""#));
    }

    #[test]
    fn analytics_totals() {
        let counts = vec![
            ConditionCount { condition: "COVID".into(), count: 3 },
            ConditionCount { condition: "NORMAL".into(), count: 2 },
        ];
        let html = render_page("", &counts);
        assert!(html.contains("Total images: 5"));
        assert!(html.contains("<td>COVID</td><td>3</td>"));
    }
}

use serde_json::Value;
use url::form_urlencoded;

use crate::fetch::fetch_json;
use crate::source::DocumentSource;
use crate::types::ChapterRecord;

pub const DEFAULT_TITLE: &str = "Chi tiết truyện";
pub const DEFAULT_CHAPTER_URL: &str = "#";

/// Parameters carried by a detail link. Empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailParams {
    pub title: Option<String>,
    pub cover: Option<String>,
    pub chapters: Option<String>,
}

impl DetailParams {
    /// Parse a query string (leading `?` optional). The first occurrence of a key wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match &*key {
                "title" => &mut params.title,
                "cover" => &mut params.cover,
                "chapters" => &mut params.chapters,
                _ => continue,
            };
            if slot.is_none() && !value.is_empty() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    /// Parse a full or relative detail link, or a bare query string.
    pub fn from_link(link: &str) -> Self {
        let link = link.split('#').next().unwrap_or_default();
        match link.split_once('?') {
            Some((_, query)) => Self::from_query(query),
            None => Self::from_query(link),
        }
    }
}

/// Resolved content of a loaded detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    pub title: String,
    pub cover: String,
    /// `None` when the document has no chapter array.
    pub chapters: Option<Vec<ChapterRecord>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    /// The link carried no `chapters` parameter; nothing was fetched.
    NoChapterData,
    Loaded(Detail),
    /// The chapters document could not be fetched or parsed.
    Failed,
}

pub async fn load_detail(source: &dyn DocumentSource, params: &DetailParams) -> DetailView {
    let Some(chapters_url) = params.chapters.as_deref() else {
        return DetailView::NoChapterData;
    };
    match fetch_json::<Value>(source, chapters_url).await {
        Ok(doc) => DetailView::Loaded(resolve(params, &doc)),
        Err(e) => {
            tracing::error!(location = chapters_url, error = %e, "failed to load chapters document");
            DetailView::Failed
        }
    }
}

/// Link parameters first, then the document's own fields, then defaults.
pub fn resolve(params: &DetailParams, doc: &Value) -> Detail {
    let title = params
        .title
        .clone()
        .or_else(|| non_empty_str(doc.get("title")))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let cover = params.cover.clone().or_else(|| non_empty_str(doc.get("cover"))).unwrap_or_default();
    let chapters = doc.get("chapters").and_then(Value::as_array).map(|list| {
        list.iter()
            .enumerate()
            .map(|(idx, c)| ChapterRecord {
                name: non_empty_str(c.get("name")).unwrap_or_else(|| format!("Chap {}", idx + 1)),
                url: non_empty_str(c.get("url")).unwrap_or_else(|| DEFAULT_CHAPTER_URL.to_string()),
            })
            .collect()
    });
    Detail { title, cover, chapters }
}

/// Display text for a document field. Missing, null, empty, `false` and zero count as absent;
/// other numbers and `true` are shown as written.
fn non_empty_str(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

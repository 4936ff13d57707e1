use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One sub-source listed in the registry document.
///
/// Entries are read leniently: a missing `id` or `name` is left empty and a
/// missing `mangaListUrl` only fails that sub-source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "mangaListUrl")]
    pub manga_list_url: Option<String>,
}

impl RegistryEntry {
    pub(crate) fn from_value(value: &Value) -> Self {
        let text = |key: &str| match value.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Self {
            id: text("id").unwrap_or_default(),
            name: text("name").unwrap_or_default(),
            manga_list_url: value
                .get("mangaListUrl")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string),
        }
    }

    /// Name for logs and failure reports, falling back to the id and then the list location.
    pub fn label(&self) -> String {
        [Some(&self.name), Some(&self.id), self.manga_list_url.as_ref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| "(unnamed)".to_string())
    }
}

/// Raw item as published in a sub-source's manga list.
/// `cover` and `chapters_json` are expected to already be absolute URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ListedManga {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub cover: String,
    #[serde(rename = "chaptersJson")]
    pub chapters_json: String,
}

/// Unified record after merging every sub-source list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MangaItem {
    pub id: String,
    pub title: String,
    pub cover: String,
    #[serde(rename = "chaptersJson")]
    pub chapters_json: String,
    #[serde(rename = "libraryId")]
    pub library_id: String,
    #[serde(rename = "libraryName")]
    pub library_name: String,
}

impl ListedManga {
    pub(crate) fn into_item(self, library: &RegistryEntry) -> MangaItem {
        MangaItem {
            id: self.id,
            title: self.title,
            cover: self.cover,
            chapters_json: self.chapters_json,
            library_id: library.id.clone(),
            library_name: library.name.clone(),
        }
    }
}

/// A single chapter link shown on the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterRecord {
    pub name: String,
    pub url: String,
}

// Feeds are hand-written JSON; ids show up as `"12"`, `12` or `null`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
        Null(()),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Float(n) => n.to_string(),
        Id::Null(()) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registry_entry_accepts_numeric_id() {
        let entry = RegistryEntry::from_value(&json!({"id": 7, "name": "Kho A", "mangaListUrl": "https://a.example/manga.json"}));
        assert_eq!(entry.id, "7");
        assert_eq!(entry.manga_list_url.as_deref(), Some("https://a.example/manga.json"));
    }

    #[test]
    fn registry_entry_tolerates_missing_fields() {
        let entry = RegistryEntry::from_value(&json!({"id": "b", "mangaListUrl": "b.json"}));
        assert_eq!(entry.name, "");
        assert_eq!(entry.label(), "b");

        let broken = RegistryEntry::from_value(&json!({"name": "Kho C", "mangaListUrl": 42}));
        assert_eq!(broken.manga_list_url, None);
        assert_eq!(broken.label(), "Kho C");

        assert_eq!(RegistryEntry::from_value(&json!("not an object")).label(), "(unnamed)");
    }

    #[test]
    fn listed_manga_carries_library_fields() {
        let raw = r#"{"id": "one-piece", "title": "One Piece", "cover": "https://a.example/op.jpg", "chaptersJson": "https://a.example/op.json"}"#;
        let listed: ListedManga = serde_json::from_str(raw).unwrap();
        let library = RegistryEntry {
            id: "a".into(),
            name: "Kho A".into(),
            manga_list_url: Some("https://a.example/manga.json".into()),
        };
        let item = listed.into_item(&library);
        assert_eq!(item.library_id, "a");
        assert_eq!(item.library_name, "Kho A");
        assert_eq!(item.chapters_json, "https://a.example/op.json");
    }

    #[test]
    fn listed_manga_id_is_optional() {
        let missing: ListedManga =
            serde_json::from_value(json!({"title": "Y", "cover": "https://a/y.jpg", "chaptersJson": "https://a/y.json"})).unwrap();
        assert_eq!(missing.id, "");
        let null: ListedManga =
            serde_json::from_value(json!({"id": null, "title": "Y", "cover": "https://a/y.jpg", "chaptersJson": "https://a/y.json"})).unwrap();
        assert_eq!(null.id, "");
    }

    #[test]
    fn listed_manga_without_title_is_rejected() {
        let raw = r#"{"id": "x", "cover": "https://a/x.jpg", "chaptersJson": "https://a/x.json"}"#;
        assert!(serde_json::from_str::<ListedManga>(raw).is_err());
    }
}

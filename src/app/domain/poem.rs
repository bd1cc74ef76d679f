use serde::Deserialize;

/// A poem as returned by the poetry source: one headline sentence plus the
/// work it was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Poem {
    pub content: String,
    pub origin: PoemOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PoemOrigin {
    pub title: String,
    #[serde(default)]
    pub dynasty: String,
    #[serde(default)]
    pub author: String,
    /// Full text of the work, one entry per line
    #[serde(default)]
    pub content: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_sentence_payload() {
        let json = r#"{
            "id": "5b8b9572e116fb3714e6fa4a",
            "content": "床前明月光，疑是地上霜。",
            "popularity": 1170000,
            "origin": {
                "title": "静夜思",
                "dynasty": "唐代",
                "author": "李白",
                "content": ["床前明月光，疑是地上霜。", "举头望明月，低头思故乡。"],
                "translate": null
            },
            "matchTags": ["月"]
        }"#;

        let poem: Poem = serde_json::from_str(json).unwrap();
        assert_eq!(poem.origin.title, "静夜思");
        assert_eq!(poem.origin.author, "李白");
        assert_eq!(poem.origin.content.len(), 2);
    }

    #[test]
    fn test_missing_origin_lines_default_to_empty() {
        let json = r#"{"content": "c", "origin": {"title": "t"}}"#;
        let poem: Poem = serde_json::from_str(json).unwrap();
        assert!(poem.origin.content.is_empty());
        assert!(poem.origin.author.is_empty());
    }
}

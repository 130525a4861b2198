use serde::{Deserialize, Serialize};

/// Placeholder replaced by the floating tag name in release templates
pub const VERSION_PLACEHOLDER: &str = "${version}";

/// A point-in-time copy of a GitHub release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Payload for creating a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRelease {
    pub tag_name: String,
    pub target_commitish: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    #[serde(serialize_with = "latest_flag")]
    pub make_latest: bool,
}

/// Payload for updating an existing release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseUpdate {
    #[serde(skip)]
    pub release_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub body: String,
    #[serde(serialize_with = "latest_flag")]
    pub make_latest: bool,
}

// The releases API takes `make_latest` as the strings "true" / "false".
fn latest_flag<S: serde::Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "true" } else { "false" })
}

/// Title and body text for the release of one floating tag kind
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReleaseTemplate {
    pub title: String,
    pub body: String,
}

impl ReleaseTemplate {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        ReleaseTemplate {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Substitute every placeholder occurrence with `tag`, returning `(title, body)`
    pub fn render(&self, tag: &str) -> (String, String) {
        (
            self.title.replace(VERSION_PLACEHOLDER, tag),
            self.body.replace(VERSION_PLACEHOLDER, tag),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_all_placeholders() {
        let template = ReleaseTemplate::new(
            "Release ${version}",
            "Tracks ${version}.x; use `@${version}`",
        );
        let (title, body) = template.render("v1");
        assert_eq!(title, "Release v1");
        assert_eq!(body, "Tracks v1.x; use `@v1`");
    }

    #[test]
    fn test_render_without_placeholder() {
        let template = ReleaseTemplate::new("Floating", "No version here");
        assert_eq!(
            template.render("2.1"),
            ("Floating".to_string(), "No version here".to_string())
        );
    }

    #[test]
    fn test_new_release_serializes_latest_as_string() {
        let release = NewRelease {
            tag_name: "v1".to_string(),
            target_commitish: "abc123".to_string(),
            name: "v1".to_string(),
            body: "body".to_string(),
            draft: false,
            make_latest: false,
        };
        let json = serde_json::to_value(&release).unwrap();
        assert_eq!(json["make_latest"], "false");
        assert_eq!(json["draft"], false);
        assert_eq!(json["target_commitish"], "abc123");
    }

    #[test]
    fn test_update_omits_id_and_missing_name() {
        let update = ReleaseUpdate {
            release_id: 7,
            name: None,
            body: "text".to_string(),
            make_latest: true,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert!(json.get("release_id").is_none());
        assert!(json.get("name").is_none());
        assert_eq!(json["make_latest"], "true");
    }

    #[test]
    fn test_release_deserializes_with_null_body() {
        let release: Release =
            serde_json::from_str(r#"{"id": 3, "tag_name": "v1.0.0", "name": null, "body": null}"#)
                .unwrap();
        assert_eq!(release.id, 3);
        assert_eq!(release.body, None);
    }
}

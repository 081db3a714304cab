//! Request and response schemas shared by the services and the HTTP layer

use serde::{Deserialize, Serialize};

/// One browsable directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub path: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDirectoriesQuery {
    pub root: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListDirectoriesResponse {
    pub directories: Vec<DirectoryEntry>,
    pub current_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSubdirectoriesRequest {
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListSubdirectoriesResponse {
    pub subdirectories: Vec<DirectoryEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListImagesRequest {
    pub folder_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageListResult {
    pub images: Vec<String>,
    pub total_count: usize,
    pub folder_path: String,
}

/// One user decision: put `filename` into `category`.
///
/// Both fields are optional on the wire; items missing either are skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategorizedImageRequest {
    pub filename: Option<String>,
    pub category: Option<String>,
}

impl CategorizedImageRequest {
    pub fn new(filename: &str, category: &str) -> Self {
        Self {
            filename: Some(filename.to_string()),
            category: Some(category.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCategorizedRequest {
    pub source_folder: Option<String>,
    pub categorized_images: Option<Vec<CategorizedImageRequest>>,
}

/// Outcome of copying one image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorizationResult {
    pub original: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renamed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CategorizationResult {
    pub fn copied(original: &str, renamed: String, category: &str) -> Self {
        Self {
            original: original.to_string(),
            renamed: Some(renamed),
            category: Some(category.to_string()),
            success: true,
            error: None,
        }
    }

    pub fn failed(original: &str, error: String) -> Self {
        Self {
            original: original.to_string(),
            renamed: None,
            category: None,
            success: false,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaveCategorizedResponse {
    pub results: Vec<CategorizationResult>,
    pub categorized_count: usize,
    pub destination_folder: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_names() {
        let listing = ImageListResult {
            images: vec!["a.jpg".into()],
            total_count: 1,
            folder_path: "/p".into(),
        };
        assert_eq!(
            serde_json::to_value(&listing).unwrap(),
            json!({ "images": ["a.jpg"], "totalCount": 1, "folderPath": "/p" })
        );

        let request: SaveCategorizedRequest = serde_json::from_value(json!({
            "sourceFolder": "/p",
            "categorizedImages": [{ "filename": "a.jpg", "category": "x" }, { "filename": "b.jpg" }]
        }))
        .unwrap();
        let items = request.categorized_images.unwrap();
        assert_eq!(items[0], CategorizedImageRequest::new("a.jpg", "x"));
        assert!(items[1].category.is_none());
    }

    #[test]
    fn test_result_omits_empty_fields() {
        let failed = CategorizationResult::failed("a.jpg", "boom".into());
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({ "original": "a.jpg", "success": false, "error": "boom" })
        );

        let copied = CategorizationResult::copied("a.jpg", "a_x.jpg".into(), "x");
        assert_eq!(
            serde_json::to_value(&copied).unwrap(),
            json!({ "original": "a.jpg", "renamed": "a_x.jpg", "category": "x", "success": true })
        );
    }
}

//! 記事・資料の絞り込み

use crate::types::Resource;

/// 種類とキーワードで絞り込む（大文字小文字は区別しない）
///
/// キーワードはタイトル・説明・タグのいずれかに含まれれば一致。
pub fn filter_resources<'a>(
    resources: &'a [Resource],
    kind: Option<&str>,
    query: Option<&str>,
) -> Vec<&'a Resource> {
    let kind = kind.map(str::trim).filter(|k| !k.is_empty()).map(str::to_lowercase);
    let query = query.map(str::trim).filter(|q| !q.is_empty()).map(str::to_lowercase);

    resources
        .iter()
        .filter(|r| match &kind {
            Some(kind) => r.kind.to_lowercase() == *kind,
            None => true,
        })
        .filter(|r| match &query {
            Some(query) => matches_query(r, query),
            None => true,
        })
        .collect()
}

fn matches_query(resource: &Resource, query: &str) -> bool {
    resource.title.to_lowercase().contains(query)
        || resource.description.to_lowercase().contains(query)
        || resource.tags.iter().any(|t| t.to_lowercase().contains(query))
}

/// 登場する種類の一覧（出現順、重複なし）
pub fn resource_kinds(resources: &[Resource]) -> Vec<&str> {
    let mut kinds: Vec<&str> = Vec::new();
    for resource in resources {
        if !resource.kind.is_empty() && !kinds.contains(&resource.kind.as_str()) {
            kinds.push(&resource.kind);
        }
    }
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Resource> {
        vec![
            Resource {
                id: "1".into(),
                title: "Composting at Home".into(),
                description: "Turn scraps into soil".into(),
                url: "https://example.com/compost".into(),
                kind: "article".into(),
                tags: vec!["compost".into()],
            },
            Resource {
                id: "2".into(),
                title: "Meal Planning".into(),
                description: "Buy only what you need".into(),
                url: "https://example.com/plan".into(),
                kind: "video".into(),
                tags: vec!["Planning".into(), "shopping".into()],
            },
            Resource {
                id: "3".into(),
                title: "Storage Guide".into(),
                description: "Keep produce fresh longer".into(),
                url: "https://example.com/storage".into(),
                kind: "Article".into(),
                tags: vec![],
            },
        ]
    }

    #[test]
    fn test_no_filter_returns_all() {
        let resources = sample();
        assert_eq!(filter_resources(&resources, None, None).len(), 3);
        assert_eq!(filter_resources(&resources, Some(" "), Some("")).len(), 3);
    }

    #[test]
    fn test_filter_by_kind_case_insensitive() {
        let resources = sample();
        let ids: Vec<&str> = filter_resources(&resources, Some("ARTICLE"), None)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_filter_by_query_matches_tags_and_description() {
        let resources = sample();
        assert_eq!(filter_resources(&resources, None, Some("shopping"))[0].id, "2");
        assert_eq!(filter_resources(&resources, None, Some("FRESH"))[0].id, "3");
        assert!(filter_resources(&resources, Some("video"), Some("compost")).is_empty());
    }

    #[test]
    fn test_resource_kinds_unique_in_order() {
        let resources = sample();
        assert_eq!(resource_kinds(&resources), vec!["article", "video", "Article"]);
    }
}

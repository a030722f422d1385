use serde::{Deserialize, Serialize};

use crate::models::{Material, MaterialType};

/// Browse-screen criteria. Empty fields match everything on their dimension;
/// the populated ones must all match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialFilter {
    pub query: String,
    pub subject_id: String,
    pub material_type: Option<MaterialType>,
}

impl MaterialFilter {
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.subject_id.is_empty() && self.material_type.is_none()
    }

    pub fn matches(&self, material: &Material) -> bool {
        if !self.query.is_empty() {
            let query = self.query.to_lowercase();
            let hit = material.title.to_lowercase().contains(&query)
                || material.description.to_lowercase().contains(&query)
                || material.subject.name.to_lowercase().contains(&query)
                || material.subject.code.to_lowercase().contains(&query);
            if !hit {
                return false;
            }
        }
        if !self.subject_id.is_empty() && material.subject_id != self.subject_id {
            return false;
        }
        if let Some(wanted) = self.material_type {
            if material.material_type != wanted {
                return false;
            }
        }
        true
    }
}

/// Pure and order-preserving: the result keeps the input's insertion order
/// and re-applying the same filter is a no-op.
pub fn apply(materials: &[Material], filter: &MaterialFilter) -> Vec<Material> {
    materials
        .iter()
        .filter(|m| filter.matches(m))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::seed;

    #[test]
    fn empty_filter_is_identity_in_order() {
        let materials = seed::seed_materials();
        let filtered = apply(&materials, &MaterialFilter::default());
        let titles: Vec<_> = filtered.iter().map(|m| m.title.as_str()).collect();
        let original: Vec<_> = materials.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, original);
    }

    #[test]
    fn filtering_is_idempotent() {
        let materials = seed::seed_materials();
        let filter = MaterialFilter {
            query: "algo".into(),
            subject_id: String::new(),
            material_type: None,
        };
        let once = apply(&materials, &filter);
        let twice = apply(&once, &filter);
        let ids_once: Vec<_> = once.iter().map(|m| m.id).collect();
        let ids_twice: Vec<_> = twice.iter().map(|m| m.id).collect();
        assert_eq!(ids_once, ids_twice);
    }

    #[test]
    fn query_and_type_combine_with_and() {
        let materials = seed::seed_materials();
        let filter = MaterialFilter {
            query: "Algorithms".into(),
            subject_id: String::new(),
            material_type: Some(MaterialType::Notes),
        };
        let filtered = apply(&materials, &filter);
        let titles: Vec<_> = filtered.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Algorithms Cheat Sheet"]);
    }

    #[test]
    fn query_matches_subject_code_case_insensitively() {
        let materials = seed::seed_materials();
        let filter = MaterialFilter {
            query: "cs401".into(),
            subject_id: String::new(),
            material_type: None,
        };
        let filtered = apply(&materials, &filter);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Operating Systems Reference Book");
    }

    #[test]
    fn subject_filter_narrows_to_that_subject() {
        let materials = seed::seed_materials();
        let filter = MaterialFilter {
            query: String::new(),
            subject_id: "cs301".into(),
            material_type: None,
        };
        let filtered = apply(&materials, &filter);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|m| m.subject_id == "cs301"));
    }
}

//! Blueprints compiled into the binary.

use arbor_core::domain::PathSet;

use crate::blueprint_loader::parse_tree;

/// Next.js App Router layout for a movie streaming platform.
pub const MOVIESTREAM_NAME: &str = "moviestream";
const MOVIESTREAM_SOURCE: &str = include_str!("../blueprints/moviestream.tree");

pub fn moviestream() -> PathSet {
    parse_tree(Some(MOVIESTREAM_NAME), MOVIESTREAM_SOURCE)
        .with_description("Next.js movie streaming app: auth, dashboard, admin, API routes")
}

/// Every built-in blueprint.
pub fn all_blueprints() -> Vec<PathSet> {
    vec![moviestream()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moviestream_is_valid() {
        moviestream().validate().unwrap();
    }

    #[test]
    fn moviestream_has_expected_shape() {
        let set = moviestream();
        assert_eq!(set.directories().count(), 92);
        assert_eq!(set.files().count(), 208);

        let has = |raw: &str| set.entries().any(|e| e.to_string() == raw);
        assert!(has("app/(admin)/admin/movies/edit/[id]/page.tsx"));
        assert!(has("app/api/auth/[...nextauth]/route.ts"));
        assert!(has("public/videos/"));
        assert!(has("tests/__mocks__/"));
        assert!(has("middleware.ts"));
        assert!(has("middleware/"));
    }

    #[test]
    fn all_blueprints_are_named() {
        assert!(all_blueprints().iter().all(|b| b.name().is_some()));
    }
}

//! Call-site argument assembly
//!
//! A transport call takes its argument groups in a fixed positional order.
//! Languages without named arguments get the shortest valid positional list:
//! the list is built from the last slot backwards, empty trailing slots are
//! dropped, and an empty slot in front of a present one becomes the
//! language's null placeholder.

use crate::ir::Location;

/// Positional order of the argument groups after the path
pub const CALL_SLOTS: [Location; 4] = [
    Location::Query,
    Location::Body,
    Location::Header,
    Location::Cookie,
];

/// Shortest positional argument list for `slots`
pub fn trailing_elision(slots: &[Option<String>], placeholder: &str) -> Vec<String> {
    let mut args: Vec<String> = Vec::with_capacity(slots.len());
    for slot in slots.iter().rev() {
        match slot {
            Some(arg) => args.push(arg.clone()),
            None if !args.is_empty() => args.push(placeholder.to_string()),
            None => {}
        }
    }
    args.reverse();
    args
}

/// Rendered argument groups of one HTTP call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSlots {
    pub query: Option<String>,
    pub body: Option<String>,
    pub header: Option<String>,
    pub cookie: Option<String>,
}

impl CallSlots {
    fn ordered(&self) -> [(Location, &Option<String>); 4] {
        [
            (Location::Query, &self.query),
            (Location::Body, &self.body),
            (Location::Header, &self.header),
            (Location::Cookie, &self.cookie),
        ]
    }

    pub fn set(&mut self, location: Location, arg: Option<String>) {
        match location {
            Location::Query => self.query = arg,
            Location::Body => self.body = arg,
            Location::Header => self.header = arg,
            Location::Cookie => self.cookie = arg,
            // path values are interpolated into the endpoint instead
            Location::Path => {}
        }
    }

    /// Positional arguments with trailing elision
    pub fn positional(&self, placeholder: &str) -> Vec<String> {
        let slots: Vec<Option<String>> = self.ordered().iter().map(|(_, s)| (*s).clone()).collect();
        trailing_elision(&slots, placeholder)
    }

    /// Present groups only, for languages that pass arguments by name
    pub fn named(&self) -> Vec<(Location, String)> {
        self.ordered()
            .into_iter()
            .filter_map(|(loc, arg)| arg.clone().map(|a| (loc, a)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_only_query_omits_everything_after_it() {
        let slots = CallSlots {
            query: some("{limit}"),
            ..Default::default()
        };
        assert_eq!(slots.positional("null"), vec!["{limit}"]);
    }

    #[test]
    fn test_only_cookie_fills_placeholders_before_it() {
        let slots = CallSlots {
            cookie: some("{session}"),
            ..Default::default()
        };
        assert_eq!(
            slots.positional("null"),
            vec!["null", "null", "null", "{session}"]
        );
    }

    #[test]
    fn test_gap_in_the_middle() {
        let slots = CallSlots {
            query: some("{fields}"),
            header: some("{x_trace}"),
            ..Default::default()
        };
        assert_eq!(
            slots.positional("undefined"),
            vec!["{fields}", "undefined", "{x_trace}"]
        );
    }

    #[test]
    fn test_nothing_present() {
        assert!(CallSlots::default().positional("nil").is_empty());
        assert!(trailing_elision(&[None, None], "nil").is_empty());
    }

    #[test]
    fn test_named_skips_absent_groups() {
        let mut slots = CallSlots::default();
        slots.set(Location::Body, some("body"));
        slots.set(Location::Cookie, some("{\"c\": c}"));
        slots.set(Location::Path, some("ignored"));
        assert_eq!(
            slots.named(),
            vec![
                (Location::Body, "body".to_string()),
                (Location::Cookie, "{\"c\": c}".to_string())
            ]
        );
    }
}

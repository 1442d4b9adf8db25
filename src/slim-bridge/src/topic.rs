// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! MQTT-style topic filters for the subscription.

/// Turn a configured subscribe topic into a filter.
///
/// A topic ending in `/` subscribes to everything below it.
pub fn subscription_filter(topic: &str) -> String {
    if topic.ends_with('/') {
        format!("{}#", topic)
    } else {
        topic.to_string()
    }
}

/// Check wildcard placement: `+` must fill a whole level and `#` must be
/// the whole last level.
pub fn validate_filter(filter: &str) -> Result<(), String> {
    if filter.is_empty() {
        return Err("topic filter must not be empty".to_string());
    }
    let levels: Vec<&str> = filter.split('/').collect();
    for (idx, level) in levels.iter().enumerate() {
        if level.contains('#') && (*level != "#" || idx + 1 != levels.len()) {
            return Err(format!(
                "'#' must be the last level of topic filter '{}'",
                filter
            ));
        }
        if level.contains('+') && *level != "+" {
            return Err(format!(
                "'+' must occupy a whole level of topic filter '{}'",
                filter
            ));
        }
    }
    Ok(())
}

/// Match a concrete topic against a filter.
pub fn topic_matches(filter: &str, topic: &str) -> bool {
    // Wildcards never match the broker's `$SYS`-style topics.
    if topic.starts_with('$') && (filter.starts_with('+') || filter.starts_with('#')) {
        return false;
    }

    let mut filter_levels = filter.split('/');
    let mut topic_levels = topic.split('/');
    loop {
        match (filter_levels.next(), topic_levels.next()) {
            (Some("#"), _) => return true,
            (Some("+"), Some(_)) => {}
            (Some(f), Some(t)) if f == t => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_becomes_multi_level_wildcard() {
        assert_eq!(subscription_filter("slim/"), "slim/#");
        assert_eq!(subscription_filter("toServer"), "toServer");
    }

    #[test]
    fn exact_topics() {
        assert!(topic_matches("toServer", "toServer"));
        assert!(!topic_matches("toServer", "toServer/x"));
        assert!(!topic_matches("toServer/x", "toServer"));
        assert!(!topic_matches("a/b", "a/c"));
    }

    #[test]
    fn multi_level_wildcard() {
        assert!(topic_matches("slim/#", "slim/buoy/17"));
        assert!(topic_matches("slim/#", "slim"));
        assert!(topic_matches("#", "anything/at/all"));
        assert!(!topic_matches("slim/#", "other/buoy"));
    }

    #[test]
    fn single_level_wildcard() {
        assert!(topic_matches("slim/+/uplink", "slim/17/uplink"));
        assert!(!topic_matches("slim/+/uplink", "slim/17/18/uplink"));
        assert!(!topic_matches("slim/+", "slim"));
    }

    #[test]
    fn dollar_topics_need_explicit_filters() {
        assert!(!topic_matches("#", "$SYS/uptime"));
        assert!(!topic_matches("+/uptime", "$SYS/uptime"));
        assert!(topic_matches("$SYS/#", "$SYS/uptime"));
    }

    #[test]
    fn filter_validation() {
        assert!(validate_filter("slim/#").is_ok());
        assert!(validate_filter("slim/+/uplink").is_ok());
        assert!(validate_filter("").is_err());
        assert!(validate_filter("slim/#/x").is_err());
        assert!(validate_filter("slim#").is_err());
        assert!(validate_filter("slim/a+").is_err());
    }
}

//! The desired schema catalog.
//!
//! Adding a column family is a data change here, not a code change: append
//! its name to the table for its kind and the reconciler picks it up on the
//! next bootstrap. Entity tables come first, then the time-ordered lines
//! derived from them, then the counters — downstream code assumes entity
//! tables precede derived indexes.

use strata_types::SchemaCatalog;

/// Families addressed by exact identifier (entity tables).
const PLAIN_FAMILIES: &[&str] = &[
    "users",
    "friends",
    "followers",
    "posts",
    "domains",
    "registrations",
    "feed_sources",
    "mail_digests",
    "shares",
    "discussions",
    "user_tags",
    "tag_followers",
    "group_members",
    "user_groups",
    "groups",
    "group_details",
    "attachments",
    "avatars",
    "domain_settings",
    "bot_settings",
    "devices",
    "bot_dedup",
];

/// Families whose rows read back in chronological order (timelines, feeds).
const TIME_ORDERED_FAMILIES: &[&str] = &[
    "timeline",
    "timeline_shares",
    "mention_line",
    "user_line",
    "user_line_shares",
    "favorite_line",
    "tag_line",
    "trend_line",
    "user_trend_line",
    "group_line",
    "user_attachment_line",
    "post_attachment_line",
    "domain_line",
    "domain_bot_line",
];

/// Counter families for aggregate tallies.
const COUNTER_FAMILIES: &[&str] = &[
    "counters",
    "tag_counters",
    "group_counters",
    "day_counters",
];

/// The full desired schema of the application, grouped plain →
/// time-ordered → counter, every entry with row caching disabled.
pub fn default_catalog() -> SchemaCatalog {
    let mut builder = SchemaCatalog::builder();
    for name in PLAIN_FAMILIES {
        builder = builder.plain(*name);
    }
    for name in TIME_ORDERED_FAMILIES {
        builder = builder.time_ordered(*name);
    }
    for name in COUNTER_FAMILIES {
        builder = builder.counter(*name);
    }
    builder.build().expect("default catalog is well formed")
}

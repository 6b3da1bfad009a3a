//! Tier classification.

use chrono::{DateTime, Utc};

use idlewatch_core::config::LifecycleConfig;
use idlewatch_database::store::TierQuery;
use idlewatch_entity::lifecycle::InactivityTier;
use idlewatch_entity::user::User;

/// Return the highest tier `user` qualifies for at `now`, if any.
///
/// Operators never qualify. Each reminder tier is checked against its own
/// marker and the spacing from the previous marker, so a long-idle account
/// still climbs the ladder one rung per eligible cycle.
pub fn classify(
    user: &User,
    policy: &LifecycleConfig,
    now: DateTime<Utc>,
) -> Option<InactivityTier> {
    InactivityTier::ALL
        .into_iter()
        .rev()
        .find(|tier| TierQuery::for_tier(*tier, policy, now).matches(user))
}

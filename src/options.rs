//! Cache Options
//!
//! Instance configuration, per-call overrides, and the shared defaults.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::normalize::{NormalizeProfile, ProfileName};

// == Max Age ==
/// How long an entry stays live after insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxAge {
    /// Never expires
    #[default]
    Forever,
    /// Expires this many milliseconds after insertion; negative values
    /// produce an entry that is already expired
    Millis(i64),
}

impl MaxAge {
    /// Creates a max age from a millisecond count.
    pub fn from_millis(ms: i64) -> Self {
        Self::Millis(ms)
    }

    /// Creates a max age from a std duration, saturating at `i64::MAX` ms.
    pub fn from_duration(duration: Duration) -> Self {
        Self::Millis(i64::try_from(duration.as_millis()).unwrap_or(i64::MAX))
    }

    /// Absolute expiration timestamp for an entry inserted at `now_ms`.
    ///
    /// Returns `None` for entries that never expire.
    pub fn expires_at(self, now_ms: i64) -> Option<i64> {
        match self {
            Self::Forever => None,
            Self::Millis(ms) => Some(now_ms.saturating_add(ms)),
        }
    }
}

// == Cache Options ==
/// Configuration fixed for the lifetime of a cache instance.
///
/// Instances hold it behind an `Arc` and never mutate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOptions {
    /// Default time-to-live for entries
    pub max_age: MaxAge,
    /// Which of the two profiles keys are normalized with
    pub profile: ProfileName,
    /// Definition of the `common` profile
    pub common_profile: NormalizeProfile,
    /// Definition of the `careful` profile
    pub careful_profile: NormalizeProfile,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            max_age: MaxAge::Forever,
            profile: ProfileName::Common,
            common_profile: NormalizeProfile::common(),
            careful_profile: NormalizeProfile::careful(),
        }
    }
}

impl CacheOptions {
    // == Shared Defaults ==
    /// Returns the process-wide default options.
    ///
    /// Every call hands out the same allocation. The static keeps one
    /// reference alive, so `Arc::get_mut` on the result always fails.
    pub fn defaults() -> Arc<CacheOptions> {
        static DEFAULTS: OnceLock<Arc<CacheOptions>> = OnceLock::new();
        Arc::clone(DEFAULTS.get_or_init(|| Arc::new(CacheOptions::default())))
    }

    pub fn with_max_age(mut self, max_age: MaxAge) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_profile(mut self, profile: ProfileName) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_common_profile(mut self, profile: NormalizeProfile) -> Self {
        self.common_profile = profile;
        self
    }

    pub fn with_careful_profile(mut self, profile: NormalizeProfile) -> Self {
        self.careful_profile = profile;
        self
    }

    /// Returns the definition of a named profile.
    pub fn profile_definition(&self, name: ProfileName) -> &NormalizeProfile {
        match name {
            ProfileName::Common => &self.common_profile,
            ProfileName::Careful => &self.careful_profile,
        }
    }

    /// Picks the profile for one operation; call overrides win.
    pub fn resolve_profile<'a>(&'a self, call: Option<&'a CallOptions>) -> &'a NormalizeProfile {
        let name = call.and_then(|c| c.profile).unwrap_or(self.profile);
        call.and_then(|c| c.profile_definition(name))
            .unwrap_or_else(|| self.profile_definition(name))
    }

    /// Picks the max age for one operation; call overrides win.
    pub fn resolve_max_age(&self, call: Option<&CallOptions>) -> MaxAge {
        call.and_then(|c| c.max_age).unwrap_or(self.max_age)
    }
}

// == Call Options ==
/// Overrides for a single `set`, leaving the instance options untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
    pub max_age: Option<MaxAge>,
    pub profile: Option<ProfileName>,
    pub common_profile: Option<NormalizeProfile>,
    pub careful_profile: Option<NormalizeProfile>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_age(mut self, max_age: MaxAge) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn profile(mut self, profile: ProfileName) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn common_profile(mut self, profile: NormalizeProfile) -> Self {
        self.common_profile = Some(profile);
        self
    }

    pub fn careful_profile(mut self, profile: NormalizeProfile) -> Self {
        self.careful_profile = Some(profile);
        self
    }

    fn profile_definition(&self, name: ProfileName) -> Option<&NormalizeProfile> {
        match name {
            ProfileName::Common => self.common_profile.as_ref(),
            ProfileName::Careful => self.careful_profile.as_ref(),
        }
    }
}

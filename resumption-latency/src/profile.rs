// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    config::Scheme,
    session::{LruSessionCache, NoSessionCache, SessionCache},
};
use std::sync::Arc;

/// A named combination of connection reuse and TLS session resumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportProfile {
    /// Short identifier, also sent in the `User-Agent` header.
    pub name: &'static str,
    /// Human readable title printed before the result.
    pub title: &'static str,
    pub keep_alive: bool,
    pub session_resumption: bool,
}

impl TransportProfile {
    const fn new(
        name: &'static str,
        title: &'static str,
        keep_alive: bool,
        session_resumption: bool,
    ) -> Self {
        TransportProfile {
            name,
            title,
            keep_alive,
            session_resumption,
        }
    }

    /// Disabling session resumption only has an effect once TLS is involved.
    pub fn applies_to(&self, scheme: Scheme) -> bool {
        self.session_resumption || scheme.is_tls()
    }

    /// Creates the session cache a fresh client for this profile starts with.
    pub fn session_cache(&self) -> Arc<dyn SessionCache> {
        if self.session_resumption {
            Arc::new(LruSessionCache::new(1))
        } else {
            Arc::new(NoSessionCache)
        }
    }
}

pub const DEFAULT: TransportProfile = TransportProfile::new("default", "default", true, true);
pub const NO_KEEPALIVE: TransportProfile =
    TransportProfile::new("no-keepalive", "no keepalive", false, true);
pub const NO_SESSION_RESUME: TransportProfile =
    TransportProfile::new("no-session-resume", "no session resume", true, false);
pub const NO_SESSION_RESUME_AND_NO_KEEPALIVE: TransportProfile = TransportProfile::new(
    "no-session-resume-and-no-keepalive",
    "no session resume and no keepalive",
    false,
    false,
);

/// Every profile, in the order they are measured.
pub const PROFILES: &[TransportProfile] = &[
    DEFAULT,
    NO_KEEPALIVE,
    NO_SESSION_RESUME,
    NO_SESSION_RESUME_AND_NO_KEEPALIVE,
];

/// The profiles measured for `scheme`, in order.
pub fn profiles_for(scheme: Scheme) -> impl Iterator<Item = &'static TransportProfile> {
    PROFILES.iter().filter(move |profile| profile.applies_to(scheme))
}

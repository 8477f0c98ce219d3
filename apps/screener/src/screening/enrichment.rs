//! Enrichment — folds external activity and credential signals into a flat bonus.
//!
//! Collaborator failures never reach the caller: they are logged and replaced
//! by the neutral record.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::screening::signals::ProfileHandles;
use crate::services::{ActivityOracle, ActivityRecord, CredentialVerifier};

/// Flat bonus for any positive activity signal. Binary, never scaled.
pub const FLAT_BONUS: f64 = 20.0;

/// Everything the enrichment stage learned about one candidate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    pub activity: ActivityRecord,
    /// `None` when no wallet was found or no verifier is configured.
    pub credential_verified: Option<bool>,
    pub bonus: f64,
}

#[derive(Clone)]
pub struct EnrichmentAdapter {
    activity: Arc<dyn ActivityOracle>,
    credentials: Option<Arc<dyn CredentialVerifier>>,
}

impl EnrichmentAdapter {
    pub fn new(
        activity: Arc<dyn ActivityOracle>,
        credentials: Option<Arc<dyn CredentialVerifier>>,
    ) -> Self {
        Self {
            activity,
            credentials,
        }
    }

    pub async fn enrich(&self, handles: &ProfileHandles) -> Enrichment {
        let activity = match handles.github.as_deref() {
            Some(handle) => self.lookup_activity(handle).await,
            None => ActivityRecord::default(),
        };

        let credential_verified = match (&self.credentials, handles.wallet.as_deref()) {
            (Some(verifier), Some(wallet)) => Some(verify_credential(verifier.as_ref(), wallet).await),
            _ => None,
        };

        let bonus = activity_bonus(&activity);

        Enrichment {
            activity,
            credential_verified,
            bonus,
        }
    }

    async fn lookup_activity(&self, handle: &str) -> ActivityRecord {
        match self.activity.lookup(handle).await {
            Ok(record) => {
                debug!(handle, repo_count = record.repo_count, "activity lookup succeeded");
                record
            }
            Err(e) => {
                warn!(handle, error = %e, "activity lookup failed; using neutral record");
                ActivityRecord::default()
            }
        }
    }
}

async fn verify_credential(verifier: &dyn CredentialVerifier, wallet: &str) -> bool {
    match verifier.verify(wallet).await {
        Ok(valid) => valid,
        Err(e) => {
            warn!(wallet, error = %e, "credential verification failed; treating as unverified");
            false
        }
    }
}

/// `FLAT_BONUS` when the record shows any repositories, otherwise zero.
pub fn activity_bonus(record: &ActivityRecord) -> f64 {
    if record.repo_count > 0 {
        FLAT_BONUS
    } else {
        0.0
    }
}

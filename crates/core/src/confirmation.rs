//! Confirmation codes for email-based signup.
//!
//! A code is an HMAC-SHA256 over a snapshot of the user's relevant state
//! (id, username, email, role, superuser flag) and the issue timestamp,
//! keyed by the server secret. Codes are stateless: nothing is stored, and
//! any change to the bound user state invalidates all outstanding codes.
//! Wire format: `"{timestamp_hex}-{mac_hex}"`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CoreError;
use crate::role::Role;
use crate::types::{DbId, Timestamp};

type HmacSha256 = Hmac<Sha256>;

/// Default code lifetime when `CONFIRMATION_MAX_AGE_HOURS` is not set.
pub const DEFAULT_MAX_AGE_HOURS: i64 = 24;

/// The user state a confirmation code is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSnapshot<'a> {
    pub id: DbId,
    pub username: &'a str,
    pub email: &'a str,
    pub role: Role,
    pub is_superuser: bool,
}

/// Issue a confirmation code for the given user state at `issued_at`.
pub fn issue_code(snapshot: &UserSnapshot<'_>, secret: &[u8], issued_at: Timestamp) -> String {
    let ts = issued_at.timestamp();
    format!("{ts:x}-{}", state_mac(snapshot, secret, ts))
}

/// Verify a confirmation code against the user's current state.
///
/// Fails if the code is malformed, expired, issued in the future, or was
/// issued for a different state snapshot. The error message deliberately
/// does not distinguish these cases.
pub fn verify_code(
    snapshot: &UserSnapshot<'_>,
    secret: &[u8],
    code: &str,
    now: Timestamp,
    max_age_hours: i64,
) -> Result<(), CoreError> {
    let (ts_part, mac_part) = code.split_once('-').ok_or_else(invalid_code)?;
    let ts = i64::from_str_radix(ts_part, 16).map_err(|_| invalid_code())?;

    let age_secs = now.timestamp() - ts;
    if age_secs < 0 || age_secs > max_age_hours * 3600 {
        return Err(invalid_code());
    }

    if state_mac(snapshot, secret, ts) != mac_part {
        return Err(invalid_code());
    }
    Ok(())
}

fn invalid_code() -> CoreError {
    CoreError::InvalidCredential {
        field: "confirmation_code",
        message: "Invalid confirmation code".to_string(),
    }
}

/// HMAC over the snapshot fields and timestamp, `\x1f`-separated so field
/// boundaries cannot be shifted.
fn state_mac(snapshot: &UserSnapshot<'_>, secret: &[u8], ts: i64) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(snapshot.id.to_be_bytes().as_slice());
    mac.update(b"\x1f");
    mac.update(snapshot.username.as_bytes());
    mac.update(b"\x1f");
    mac.update(snapshot.email.as_bytes());
    mac.update(b"\x1f");
    mac.update(snapshot.role.as_str().as_bytes());
    mac.update(b"\x1f");
    mac.update(&[snapshot.is_superuser as u8]);
    mac.update(b"\x1f");
    mac.update(ts.to_be_bytes().as_slice());
    format!("{:x}", mac.finalize().into_bytes())
}

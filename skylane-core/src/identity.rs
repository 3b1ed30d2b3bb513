use chrono::Utc;
use rand::Rng;

/// Alphabet for the random order-number suffix. Uppercase alphanumerics
/// with the easily-confused characters (0/O, 1/I/L, U/V) removed, since
/// order numbers are read back over the phone.
const SUFFIX_ALPHABET: &[u8] = b"23456789ABCDEFGHJKMNPQRSTWXYZ";

const SUFFIX_LEN: usize = 6;

/// Generates an order number of the form `ORD<yyyymmdd><6-char suffix>`.
///
/// The suffix comes from the thread-local RNG, so independently deployed
/// order-service instances do not need a shared sequence to avoid
/// colliding. The date prefix keeps numbers roughly sortable for humans.
pub fn generate_order_number() -> String {
    let date = Utc::now().format("%Y%m%d");
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("ORD{date}{suffix}")
}

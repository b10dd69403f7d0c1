use sha2::{Digest, Sha256};

/// Length of an Xcode object identifier in hex characters.
pub const OBJECT_ID_LEN: usize = 24;

/// Derive a fresh 24-hex-digit object identifier.
///
/// Identifiers are a pure function of `(owner, name, attempt)`, so repeated
/// runs over the same project produce the same ids. `is_taken` is consulted
/// to skip identifiers already present in the file.
pub fn generate_object_id(owner: &str, name: &str, is_taken: impl Fn(&str) -> bool) -> String {
    let mut attempt: u32 = 0;
    loop {
        let mut hasher = Sha256::new();
        hasher.update(owner.as_bytes());
        hasher.update([0]);
        hasher.update(name.as_bytes());
        hasher.update([0]);
        hasher.update(attempt.to_be_bytes());
        let digest = hasher.finalize();

        let id: String = digest[..OBJECT_ID_LEN / 2].iter().map(|b| format!("{b:02X}")).collect();
        if !is_taken(&id) {
            return id;
        }
        attempt += 1;
    }
}

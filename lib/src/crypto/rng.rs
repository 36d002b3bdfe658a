use rand_core::{CryptoRng, OsRng, RngCore};

#[inline]
pub fn get_rng() -> impl RngCore + CryptoRng {
    OsRng
}

/// Fills an array of any length from the OS RNG. Used for group
/// identifiers, master keys and nonces.
#[inline]
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut array = [0u8; N];
    get_rng().fill_bytes(&mut array);

    array
}

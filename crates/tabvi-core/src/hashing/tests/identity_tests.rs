use crate::{IdentityHasher, StateHasher};

#[test]
fn identity_key_is_the_state_itself() {
    let hasher = IdentityHasher;

    let key = hasher.hash_state(&(3_u8, "x"));

    assert_eq!(key, (3, "x"));
    assert!(<IdentityHasher as StateHasher<(u8, &str)>>::equals(
        &hasher,
        &key,
        &(3, "x")
    ));
    assert!(!<IdentityHasher as StateHasher<(u8, &str)>>::equals(
        &hasher,
        &key,
        &(4, "x")
    ));
}

use rand::Rng;

/// Random id for connections and connection-slot tokens. Never zero.
pub fn rand_id() -> u64 {
    rand::thread_rng().gen_range(1..=u64::MAX)
}

//! Assorted sizing helpers.

/// Smallest shard handed to a worker when a column is split.
pub const MIN_SHARD: usize = 256;

/// Number of table slots for a codec with `num_profiles` profiles and an
/// auxiliary axis of `aux_states`.
///
/// Computed in `u128` so the size check itself cannot overflow.
#[inline]
pub fn table_states(num_profiles: u64, aux_states: usize) -> u128 {
    u128::from(num_profiles) * aux_states.max(1) as u128
}

/// Shard size for splitting `live` states across `workers` threads.
///
/// Aims for about four shards per worker so uneven transition fan-out still
/// balances, without going below [`MIN_SHARD`].
#[inline]
pub fn default_shard_size(live: usize, workers: usize) -> usize {
    let shards = workers.max(1) * 4;
    live.div_ceil(shards).max(MIN_SHARD)
}

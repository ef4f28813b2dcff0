//! Fixed-size season partitioning over a flat episode index.
//!
//! No upstream source knows about seasons; they are derived from the total
//! episode count alone and must be recomputed identically wherever they are
//! displayed or used to compute an episode-fetch offset.

use crate::model::Season;

/// Season bucket size used across the catalog.
pub const EPISODES_PER_SEASON: u32 = 100;

/// Partition `total` episodes into zero-based seasons of `size` episodes.
/// Season `i` covers `[i*size+1, min((i+1)*size, total)]`.
pub fn partition(total: u32, size: u32) -> Vec<Season> {
    debug_assert!(size > 0);
    let groups = total.div_ceil(size);

    (0..groups)
        .map(|number| {
            let start = season_start(number, size);
            let end = ((number + 1) * size).min(total);
            Season {
                number,
                name: format!("{start}-{end}"),
            }
        })
        .collect()
}

/// 1-based index of the first episode in a season; doubles as the
/// episode-page offset when fetching that season.
pub fn season_start(number: u32, size: u32) -> u32 {
    number * size + 1
}

fn probe_half_extents() -> Vec3 {
    Vec3::new(PROBE_HALF_EXTENT, PROBE_HALF_EXTENT, PROBE_HALF_EXTENT)
}

/// Maps the 2D input axis onto the ground plane. The axis y drives
/// world z.
fn move_direction_from_axis(axis: (f32, f32)) -> Vec3 {
    Vec3::new(axis.0, 0.0, axis.1).normalized_or_zero()
}

/// Linear min-scan over squared distances. Earlier candidates win
/// ties, which keeps selection deterministic for equidistant entries.
fn nearest_by_distance<T: Copy>(candidates: &[(T, Vec3)], from: Vec3) -> Option<T> {
    let mut best: Option<(T, f32)> = None;
    for &(value, position) in candidates {
        let distance_sq = position.sub(from).length_sq();
        let closer = match best {
            Some((_, best_sq)) => distance_sq < best_sq,
            None => true,
        };
        if closer {
            best = Some((value, distance_sq));
        }
    }
    best.map(|(value, _)| value)
}

pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

/// Moves forward by `step` without running past the last row.
pub const fn clamp_forward(index: usize, step: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    let next = index.saturating_add(step);
    if next >= len {
        len - 1
    } else {
        next
    }
}

use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RandomError {
    #[error("invalid range [{min}, {max})")]
    InvalidRange { min: i64, max: i64 },
    #[error("requested {count} distinct values but [{min}, {max}) only holds {available}")]
    RangeExhausted {
        min: i64,
        max: i64,
        count: usize,
        available: u64,
    },
}

/// Draws `count` distinct integers uniformly from `[min, max)`.
///
/// Duplicates are rejected and redrawn, so the loop only terminates when
/// `count <= max - min`. That precondition is checked up front and reported as
/// [`RandomError::RangeExhausted`] instead of spinning forever. Requests close
/// to the size of the range still converge slowly.
pub fn gen_random_numbers<R: Rng + ?Sized>(
    rng: &mut R,
    min: i64,
    max: i64,
    count: usize,
) -> Result<Vec<i64>, RandomError> {
    let available = max
        .checked_sub(min)
        .filter(|span| *span >= 0)
        .ok_or(RandomError::InvalidRange { min, max })? as u64;

    if count as u64 > available {
        return Err(RandomError::RangeExhausted {
            min,
            max,
            count,
            available,
        });
    }

    let mut values = Vec::with_capacity(count);
    while values.len() < count {
        let r = rng.random_range(min..max);
        if !values.contains(&r) {
            values.push(r);
        }
    }
    Ok(values)
}

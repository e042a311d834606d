use crate::{Error, Result};

/// Norms below this are treated as zero and left unnormalized.
pub const MIN_NORM: f64 = 1e-10;

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    check_dimensions(a, b)?;

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < MIN_NORM {
        return Ok(0.0);
    }
    Ok(dot / denom)
}

pub fn l2_norm(v: &[f32]) -> f64 {
    v.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt()
}

/// Linear blend `(1 - alpha) * a + alpha * b`, L2-normalized unless the
/// blended vector is degenerate.
pub fn blend(a: &[f32], b: &[f32], alpha: f64) -> Result<Vec<f32>> {
    check_dimensions(a, b)?;

    let blended: Vec<f64> = a
        .iter()
        .zip(b)
        .map(|(x, y)| (1.0 - alpha) * (*x as f64) + alpha * (*y as f64))
        .collect();

    let norm = blended.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm < MIN_NORM {
        return Ok(blended.into_iter().map(|x| x as f32).collect());
    }
    Ok(blended.into_iter().map(|x| (x / norm) as f32).collect())
}

fn check_dimensions(a: &[f32], b: &[f32]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::validation(format!(
            "Vector dimensions differ: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &[f32], b: &[f32]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-6, "{x} != {y}");
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap() - 1.0).abs() < 1e-9);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-9);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap() + 1.0).abs() < 1e-9);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_blend_with_itself_is_unit_vector() {
        let v = [0.6f32, 0.8, 0.0];
        for alpha in [0.0, 0.35, 0.5, 1.0] {
            assert_close(&blend(&v, &v, alpha).unwrap(), &v);
        }

        let unnormalized = [3.0f32, 4.0];
        assert_close(&blend(&unnormalized, &unnormalized, 0.35).unwrap(), &[0.6, 0.8]);
    }

    #[test]
    fn test_blend_weights_refinement() {
        let out = blend(&[1.0, 0.0], &[0.0, 1.0], 0.35).unwrap();
        assert!(out[0] > out[1]);
        assert!((l2_norm(&out) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_blend_degenerate_returns_raw() {
        let out = blend(&[1.0, 0.0], &[-1.0, 0.0], 0.5).unwrap();
        assert_close(&out, &[0.0, 0.0]);
    }

    #[test]
    fn test_blend_rejects_dimension_mismatch() {
        assert!(blend(&[1.0, 0.0], &[1.0], 0.35).is_err());
        assert!(cosine_similarity(&[1.0], &[1.0, 2.0]).is_err());
    }
}

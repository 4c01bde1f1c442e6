/// In-place L2 normalization; zero vectors are left untouched.
pub(crate) fn l2_normalize_in_place(v: &mut [f64]) {
    let norm_sq: f64 = v.iter().map(|x| x * x).sum();
    if norm_sq > 0.0 {
        let inv_norm = norm_sq.sqrt().recip();
        for x in v.iter_mut() {
            *x *= inv_norm;
        }
    }
}

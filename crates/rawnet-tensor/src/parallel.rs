/// Runs the closure inside a rayon scope when the `parallel` feature is enabled, or directly
/// otherwise.
///
/// The calling crate must declare its own `parallel` feature and depend on `rayon`.
#[macro_export]
macro_rules! run_par {
    (
        $func:expr
    ) => {{
        #[cfg(feature = "parallel")]
        use rayon::prelude::*;

        #[cfg(feature = "parallel")]
        #[allow(clippy::redundant_closure_call)]
        let output = rayon::scope(|_| $func());

        #[cfg(not(feature = "parallel"))]
        #[allow(clippy::redundant_closure_call)]
        let output = $func();

        output
    }};
}

/// Iterates over a range, in parallel when the `parallel` feature is enabled.
#[macro_export]
macro_rules! iter_range_par {
    (
        $start:expr, $end:expr
    ) => {{
        #[cfg(feature = "parallel")]
        let output = ($start..$end).into_par_iter();

        #[cfg(not(feature = "parallel"))]
        let output = ($start..$end);

        output
    }};
}

/// Iterates over mutable chunks of a slice, in parallel when the `parallel` feature is enabled.
#[macro_export]
macro_rules! chunks_mut_par {
    (
        $slice:expr, $size:expr
    ) => {{
        #[cfg(feature = "parallel")]
        let output = $slice.par_chunks_mut($size);

        #[cfg(not(feature = "parallel"))]
        let output = $slice.chunks_mut($size);

        output
    }};
}

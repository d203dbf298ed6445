//! Deterministic byte corpora.

/// `count` distinct, printable words: `"word-0"`, `"word-1"`, ...
pub fn words(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("word-{i}")).collect()
}

/// A workload in which each of `distinct` words appears `repeats` times.
///
/// Rounds are interleaved (every word once, then every word again) and
/// each round walks the words with a different stride so consecutive
/// duplicates are rare.
pub fn dictionary_workload(distinct: usize, repeats: usize) -> Vec<Vec<u8>> {
    let words = words(distinct);
    let mut out = Vec::with_capacity(distinct * repeats);
    for round in 0..repeats {
        let stride = coprime_stride(distinct, round);
        for i in 0..distinct {
            out.push(words[(i * stride) % distinct].clone().into_bytes());
        }
    }
    out
}

/// Smallest stride `>= round + 1` that is coprime with `n`, so stepping by
/// it visits every index of `0..n` exactly once.
fn coprime_stride(n: usize, round: usize) -> usize {
    let mut stride = round + 1;
    while n > 1 && gcd(stride, n) != 1 {
        stride += 1;
    }
    stride
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Every prefix of `b"xxx..."` from the empty chunk up to `max_len` bytes.
///
/// The chunks differ only in length, which is what a length-blind fold
/// cannot see.
pub fn prefix_ladder(max_len: usize) -> Vec<Vec<u8>> {
    (0..=max_len).map(|len| vec![b'x'; len]).collect()
}

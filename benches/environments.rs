use criterion::{criterion_group, criterion_main, Criterion};
use texmml::{push_mathml, Configuration, Parser, RenderConfig, Storage};

fn round_trip(config: &Configuration, input: &str) {
    let storage = Storage::new();
    let document = Parser::new(input, config, &storage).parse();
    let mut str = String::new();
    push_mathml(&mut str, &document, RenderConfig::default());
}

fn arrays(c: &mut Criterion) {
    let config = Configuration::default();
    c.bench_function("arrays", |b| {
        b.iter(|| {
            round_trip(
                &config,
                r#"\begin{array}{|c|r|l|}
    a + b \\[2em]
    a + b & c & d \\[2em] \hline
    a + b
\end{array}
\begin{array}{c:c:c}
   a & b & c \\ \hline
   d & e & f \\
   \hdashline
   g & h & i
\end{array}"#,
            );
        })
    });
}

fn matrices(c: &mut Criterion) {
    let config = Configuration::default();
    c.bench_function("matrices", |b| {
        b.iter(|| {
            round_trip(
                &config,
                r#"\begin{matrix}
    a & b & c \\
    d & e & f \\
    g & h & i \\
\end{matrix}
\begin{pmatrix}
    1 & 2 & 3 & 4 & 5 & 6 & 7 & 8 & 9 & 10 \\
    11 & 12 & 13 & 14 & 15 & 16 & 17 & 18 & 19 & 20 \\
    21 & 22 & 23 & 24 & 25 & 26 & 27 & 28 & 29 & 30 \\
    31 & 32 & 33 & 34 & 35 & 36 & 37 & 38 & 39 & 40 \\
    41 & 42 & 43 & 44 & 45 & 46 & 47 & 48 & 49 & 50
\end{pmatrix}"#,
            );
        })
    });
}

fn plain_matrices(c: &mut Criterion) {
    let config = Configuration::default();
    c.bench_function("plain matrices", |b| {
        b.iter(|| {
            round_trip(
                &config,
                r"\pmatrix{a & b \cr c & d} \cases{1 & if $x > 0$ \cr 0 & otherwise}
                \eqalignno{x &= y & (1) \cr z &= w & (2)}",
            );
        })
    });
}

criterion_group!(benches, arrays, matrices, plain_matrices);
criterion_main!(benches);

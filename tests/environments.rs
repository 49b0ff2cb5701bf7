mod common;

fn main() {
    let conclusion = common::test();
    common::output("environments.html").unwrap();
    conclusion.exit();
}

macro_rules! mtable {
    ($attributes:literal, $($row:literal),+ $(,)?) => {
        concat!("<mtable ", $attributes, ">", $($row),+, "</mtable>")
    };
}

round_trip!(
    matrix_without_braces,
    r"\matrix a",
    mtable!(
        r#"rowspacing="4pt" columnspacing="1em" data-frame-styles="" framespacing=".2em .125em""#,
        "<mtr><mtd><mi>a</mi></mtd></mtr>"
    )
);
round_trip!(
    matrix_rows,
    r"\array{a&b\\ c&d}",
    mtable!(
        r#"rowspacing="4pt" columnspacing="1em" data-frame-styles="" framespacing=".2em .125em""#,
        "<mtr><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd></mtr>",
        "<mtr><mtd><mi>c</mi></mtd><mtd><mi>d</mi></mtd></mtr>"
    )
);
round_trip!(
    matrix_cr,
    r"\array{a\cr b}",
    mtable!(
        r#"rowspacing="4pt" columnspacing="1em" data-frame-styles="" framespacing=".2em .125em""#,
        "<mtr><mtd><mi>a</mi></mtd></mtr>",
        "<mtr><mtd><mi>b</mi></mtd></mtr>"
    )
);
round_trip!(
    matrix_row_spacing,
    r"\array{a\\[1cm] b}",
    mtable!(
        r#"rowspacing="3.235em 0.4em" columnspacing="1em" data-frame-styles="" framespacing=".2em .125em""#,
        "<mtr><mtd><mi>a</mi></mtd></mtr>",
        "<mtr><mtd><mi>b</mi></mtd></mtr>"
    )
);
round_trip!(
    matrix_subscript,
    r"X_{\matrix{a&b}}",
    concat!(
        r#"<msub><mi>X</mi><mrow data-mjx-texclass="ORD">"#,
        mtable!(
            r#"rowspacing="4pt" columnspacing="1em" data-frame-styles="" framespacing=".2em .125em""#,
            "<mtr><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd></mtr>"
        ),
        "</mrow></msub>"
    )
);
round_trip!(
    parenthesized_matrix,
    r"\pmatrix{a&b}",
    concat!(
        r#"<mrow data-mjx-texclass="INNER"><mo data-mjx-texclass="OPEN">(</mo>"#,
        mtable!(
            r#"rowspacing="4pt" columnspacing="1em" data-frame-styles="" framespacing=".2em .125em""#,
            "<mtr><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd></mtr>"
        ),
        r#"<mo data-mjx-texclass="CLOSE">)</mo></mrow>"#
    )
);
round_trip!(
    cases,
    r"\cases{a}",
    concat!(
        r#"<mrow data-mjx-texclass="INNER"><mo data-mjx-texclass="OPEN">{</mo>"#,
        mtable!(
            r#"rowspacing=".2em" columnspacing="1em" columnalign="left left" data-frame-styles="" framespacing=".2em .125em""#,
            "<mtr><mtd><mi>a</mi></mtd></mtr>"
        ),
        r#"<mo data-mjx-texclass="CLOSE" fence="true" stretchy="true" symmetric="true"></mo></mrow>"#
    )
);
round_trip!(
    numbered_alignment,
    r"\eqalignno{a&b&c}",
    mtable!(
        r#"rowspacing=".5em" columnspacing="0.278em" displaystyle="true" columnalign="right left""#,
        "<mlabeledtr><mtd><mi>c</mi></mtd><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd></mlabeledtr>"
    )
);

round_trip!(
    array_single_cell,
    r"\begin{array}{c}a\end{array}",
    mtable!(
        r#"columnspacing="1em" rowspacing="4pt" data-frame-styles="" framespacing=".5em .125em""#,
        "<mtr><mtd><mi>a</mi></mtd></mtr>"
    )
);
round_trip!(
    array_side_lines,
    r"\begin{array}{|c|}a\end{array}",
    concat!(
        r#"<menclose notation="left right" data-padding="0">"#,
        mtable!(
            r#"columnspacing="1em" rowspacing="4pt" data-frame-styles="" framespacing=".5em .125em""#,
            "<mtr><mtd><mi>a</mi></mtd></mtr>"
        ),
        "</menclose>"
    )
);
round_trip!(
    array_top_and_bottom_lines,
    r"\begin{array}{c}\hline a\\\hline\end{array}",
    concat!(
        r#"<menclose notation="top bottom" data-padding="0">"#,
        mtable!(
            r#"columnspacing="1em" rowspacing="4pt" data-frame-styles="" framespacing=".5em .125em""#,
            "<mtr><mtd><mi>a</mi></mtd></mtr>"
        ),
        "</menclose>"
    )
);
round_trip!(
    array_solid_frame,
    r"\begin{array}{|c|}\hline a\\\hline\end{array}",
    mtable!(
        r#"columnspacing="1em" rowspacing="4pt" framespacing=".5em .125em" frame="solid""#,
        "<mtr><mtd><mi>a</mi></mtd></mtr>"
    )
);
round_trip!(
    array_mixed_frame,
    r"\begin{array}{:c:}\hline a\\\hline\end{array}",
    mtable!(
        r#"columnspacing="1em" rowspacing="4pt" data-frame-styles="solid dashed solid dashed" framespacing=".5em .125em""#,
        "<mtr><mtd><mi>a</mi></mtd></mtr>"
    )
);
round_trip!(
    array_dashed_column,
    r"\begin{array}{c:c}a&c\\b&d\end{array}",
    mtable!(
        r#"columnspacing="1em" rowspacing="4pt" columnalign="center center" columnlines="dashed" data-frame-styles="" framespacing=".5em .125em""#,
        "<mtr><mtd><mi>a</mi></mtd><mtd><mi>c</mi></mtd></mtr>",
        "<mtr><mtd><mi>b</mi></mtd><mtd><mi>d</mi></mtd></mtr>"
    )
);
round_trip!(
    array_dashed_row,
    r"\begin{array}{c}a\\\hdashline b\end{array}",
    mtable!(
        r#"columnspacing="1em" rowspacing="4pt" rowlines="dashed" data-frame-styles="" framespacing=".5em .125em""#,
        "<mtr><mtd><mi>a</mi></mtd></mtr>",
        "<mtr><mtd><mi>b</mi></mtd></mtr>"
    )
);
round_trip!(
    array_framed_solid_row,
    r"\begin{array}{|c|}a\\\hline b\end{array}",
    concat!(
        r#"<menclose notation="left right" data-padding="0">"#,
        mtable!(
            r#"columnspacing="1em" rowspacing="4pt" rowlines="solid" data-frame-styles="" framespacing=".5em .125em""#,
            "<mtr><mtd><mi>a</mi></mtd></mtr>",
            "<mtr><mtd><mi>b</mi></mtd></mtr>"
        ),
        "</menclose>"
    )
);
round_trip!(
    array_column_lines_and_none,
    r"\begin{array}{c|cc}a&b&c\\d&e&f\end{array}",
    mtable!(
        r#"columnspacing="1em" rowspacing="4pt" columnalign="center center center" columnlines="solid none" data-frame-styles="" framespacing=".5em .125em""#,
        "<mtr><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd><mtd><mi>c</mi></mtd></mtr>",
        "<mtr><mtd><mi>d</mi></mtd><mtd><mi>e</mi></mtd><mtd><mi>f</mi></mtd></mtr>"
    )
);
round_trip!(
    array_mixed_lines,
    r"\begin{array}{c|c:cc}0&a&b&c\\\hline 1&d&e&f\\\hdashline 2&g&h&i\\ 3&j&k&l \end{array}",
    mtable!(
        r#"columnspacing="1em" rowspacing="4pt" columnalign="center center center center" columnlines="solid dashed none" rowlines="solid dashed none" data-frame-styles="" framespacing=".5em .125em""#,
        "<mtr><mtd><mn>0</mn></mtd><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd><mtd><mi>c</mi></mtd></mtr>",
        "<mtr><mtd><mn>1</mn></mtd><mtd><mi>d</mi></mtd><mtd><mi>e</mi></mtd><mtd><mi>f</mi></mtd></mtr>",
        "<mtr><mtd><mn>2</mn></mtd><mtd><mi>g</mi></mtd><mtd><mi>h</mi></mtd><mtd><mi>i</mi></mtd></mtr>",
        "<mtr><mtd><mn>3</mn></mtd><mtd><mi>j</mi></mtd><mtd><mi>k</mi></mtd><mtd><mi>l</mi></mtd></mtr>"
    )
);
round_trip!(
    array_in_fences,
    r"\left( \begin{array}{ccc}a & b & c \\d & e & f \\g & h & i \end{array} \right)",
    concat!(
        r#"<mrow data-mjx-texclass="INNER"><mo data-mjx-texclass="OPEN">(</mo>"#,
        mtable!(
            r#"columnspacing="1em" rowspacing="4pt" columnalign="center center center" data-frame-styles="" framespacing=".5em .125em""#,
            "<mtr><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd><mtd><mi>c</mi></mtd></mtr>",
            "<mtr><mtd><mi>d</mi></mtd><mtd><mi>e</mi></mtd><mtd><mi>f</mi></mtd></mtr>",
            "<mtr><mtd><mi>g</mi></mtd><mtd><mi>h</mi></mtd><mtd><mi>i</mi></mtd></mtr>"
        ),
        r#"<mo data-mjx-texclass="CLOSE">)</mo></mrow>"#
    )
);
round_trip!(
    array_hfill_between,
    r"\begin{array}{c}a\hfill b\end{array}",
    mtable!(
        r#"columnspacing="1em" rowspacing="4pt" data-frame-styles="" framespacing=".5em .125em""#,
        "<mtr><mtd><mi>a</mi><mi>b</mi></mtd></mtr>"
    )
);

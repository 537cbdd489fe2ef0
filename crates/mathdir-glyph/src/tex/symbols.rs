//! Symbol and operator tables.

/// Glyph and role class for a symbol command.
pub(crate) fn symbol(name: &str) -> Option<(&'static str, &'static str)> {
    let entry = match name {
        // Greek
        "alpha" => ("α", "mord"),
        "beta" => ("β", "mord"),
        "gamma" => ("γ", "mord"),
        "delta" => ("δ", "mord"),
        "epsilon" | "varepsilon" => ("ε", "mord"),
        "zeta" => ("ζ", "mord"),
        "eta" => ("η", "mord"),
        "theta" => ("θ", "mord"),
        "lambda" => ("λ", "mord"),
        "mu" => ("μ", "mord"),
        "pi" => ("π", "mord"),
        "rho" => ("ρ", "mord"),
        "sigma" => ("σ", "mord"),
        "tau" => ("τ", "mord"),
        "phi" | "varphi" => ("φ", "mord"),
        "omega" => ("ω", "mord"),
        "Delta" => ("Δ", "mord"),
        "Sigma" => ("Σ", "mord"),
        "Omega" => ("Ω", "mord"),
        // Ordinary symbols
        "infty" => ("∞", "mord"),
        "partial" => ("∂", "mord"),
        "nabla" => ("∇", "mord"),
        "angle" => ("∠", "mord"),
        "triangle" => ("△", "mord"),
        "degree" => ("°", "mord"),
        "prime" => ("′", "mord"),
        "emptyset" => ("∅", "mord"),
        "forall" => ("∀", "mord"),
        "exists" => ("∃", "mord"),
        "ldots" | "dots" => ("…", "minner"),
        "cdots" => ("⋯", "minner"),
        // Binary operators
        "times" => ("×", "mbin"),
        "div" => ("÷", "mbin"),
        "pm" => ("±", "mbin"),
        "mp" => ("∓", "mbin"),
        "cdot" => ("⋅", "mbin"),
        "ast" => ("∗", "mbin"),
        "circ" => ("∘", "mbin"),
        "cup" => ("∪", "mbin"),
        "cap" => ("∩", "mbin"),
        // Relations
        "neq" | "ne" => ("≠", "mrel"),
        "leq" | "le" => ("≤", "mrel"),
        "geq" | "ge" => ("≥", "mrel"),
        "approx" => ("≈", "mrel"),
        "equiv" => ("≡", "mrel"),
        "sim" => ("∼", "mrel"),
        "to" | "rightarrow" => ("→", "mrel"),
        "leftarrow" => ("←", "mrel"),
        "Rightarrow" => ("⇒", "mrel"),
        "Leftrightarrow" => ("⇔", "mrel"),
        "in" => ("∈", "mrel"),
        "notin" => ("∉", "mrel"),
        "subset" => ("⊂", "mrel"),
        "subseteq" => ("⊆", "mrel"),
        "perp" => ("⊥", "mrel"),
        "parallel" => ("∥", "mrel"),
        // Delimiters
        "{" | "lbrace" => ("{", "mopen"),
        "}" | "rbrace" => ("}", "mclose"),
        "langle" => ("⟨", "mopen"),
        "rangle" => ("⟩", "mclose"),
        "lvert" => ("|", "mopen"),
        "rvert" => ("|", "mclose"),
        "|" => ("‖", "mord"),
        "%" => ("%", "mord"),
        "$" => ("$", "mord"),
        "#" => ("#", "mord"),
        "&" => ("&", "mord"),
        _ => return None,
    };
    Some(entry)
}

/// Glyph for an operator command (`mop`), large or function-like.
pub(crate) fn operator(name: &str) -> Option<&'static str> {
    let glyph = match name {
        "sum" => "∑",
        "prod" => "∏",
        "coprod" => "∐",
        "int" => "∫",
        "iint" => "∬",
        "oint" => "∮",
        "bigcup" => "⋃",
        "bigcap" => "⋂",
        "lim" => "lim",
        "max" => "max",
        "min" => "min",
        "sup" => "sup",
        "inf" => "inf",
        "sin" => "sin",
        "cos" => "cos",
        "tan" => "tan",
        "cot" => "cot",
        "sec" => "sec",
        "csc" => "csc",
        "log" => "log",
        "ln" => "ln",
        "exp" => "exp",
        "det" => "det",
        _ => return None,
    };
    Some(glyph)
}

/// Width of a spacing command, or `None` when it is not one.
///
/// Negative spacing yields an empty string.
pub(crate) fn spacing(name: &str) -> Option<&'static str> {
    let text = match name {
        "," | "thinspace" => "\u{2009}",
        ":" | ";" | " " => " ",
        "quad" => "\u{2003}",
        "qquad" => "\u{2003}\u{2003}",
        "!" => "",
        _ => return None,
    };
    Some(text)
}

/// Role class for a plain character.
pub(crate) fn char_class(c: char) -> &'static str {
    match c {
        '+' | '-' | '*' | '/' => "mbin",
        '=' | '<' | '>' | ':' => "mrel",
        ',' | ';' => "mpunct",
        '(' | '[' => "mopen",
        ')' | ']' | '!' | '?' => "mclose",
        c if c.is_numeric() => "mnum",
        _ => "mord",
    }
}

/// Display glyph for a plain character.
pub(crate) fn char_glyph(c: char) -> char {
    match c {
        '-' => '−',
        '*' => '∗',
        '\'' => '′',
        c => c,
    }
}

/// Style commands that produce no glyph of their own.
pub(crate) fn is_style_command(name: &str) -> bool {
    matches!(name, "displaystyle" | "textstyle" | "scriptstyle" | "\\")
}

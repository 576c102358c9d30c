//! Stylesheet for syntax-highlighted code blocks.
//!
//! Renderers that emit Pygments "short" token classes (`k`, `s2`, `nf`, ...)
//! on code elements need matching CSS. [`stylesheet`] produces the rules of
//! the Pygments `default` style, scoped to a CSS selector.

/// Highlighting style for code blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightStyle {
    /// The Pygments `default` color scheme.
    #[default]
    Default,
    /// No highlighting stylesheet.
    Disabled,
}

impl HighlightStyle {
    /// Parse a style name. An empty name disables highlighting.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "default" => Some(Self::Default),
            "" => Some(Self::Disabled),
            _ => None,
        }
    }
}

/// `(class, declarations, token name)` for the Pygments default style.
const DEFAULT_RULES: &[(&str, &str, &str)] = &[
    ("c", "color: #3D7B7B; font-style: italic", "Comment"),
    ("err", "border: 1px solid #FF0000", "Error"),
    ("k", "color: #008000; font-weight: bold", "Keyword"),
    ("o", "color: #666666", "Operator"),
    ("ch", "color: #3D7B7B; font-style: italic", "Comment.Hashbang"),
    ("cm", "color: #3D7B7B; font-style: italic", "Comment.Multiline"),
    ("cp", "color: #9C6500", "Comment.Preproc"),
    ("cpf", "color: #3D7B7B; font-style: italic", "Comment.PreprocFile"),
    ("c1", "color: #3D7B7B; font-style: italic", "Comment.Single"),
    ("cs", "color: #3D7B7B; font-style: italic", "Comment.Special"),
    ("gd", "color: #A00000", "Generic.Deleted"),
    ("ge", "font-style: italic", "Generic.Emph"),
    ("ges", "font-weight: bold; font-style: italic", "Generic.EmphStrong"),
    ("gr", "color: #E40000", "Generic.Error"),
    ("gh", "color: #000080; font-weight: bold", "Generic.Heading"),
    ("gi", "color: #008400", "Generic.Inserted"),
    ("go", "color: #717171", "Generic.Output"),
    ("gp", "color: #000080; font-weight: bold", "Generic.Prompt"),
    ("gs", "font-weight: bold", "Generic.Strong"),
    ("gu", "color: #800080; font-weight: bold", "Generic.Subheading"),
    ("gt", "color: #0044DD", "Generic.Traceback"),
    ("kc", "color: #008000; font-weight: bold", "Keyword.Constant"),
    ("kd", "color: #008000; font-weight: bold", "Keyword.Declaration"),
    ("kn", "color: #008000; font-weight: bold", "Keyword.Namespace"),
    ("kp", "color: #008000", "Keyword.Pseudo"),
    ("kr", "color: #008000; font-weight: bold", "Keyword.Reserved"),
    ("kt", "color: #B00040", "Keyword.Type"),
    ("m", "color: #666666", "Literal.Number"),
    ("s", "color: #BA2121", "Literal.String"),
    ("na", "color: #687822", "Name.Attribute"),
    ("nb", "color: #008000", "Name.Builtin"),
    ("nc", "color: #0000FF; font-weight: bold", "Name.Class"),
    ("no", "color: #880000", "Name.Constant"),
    ("nd", "color: #AA22FF", "Name.Decorator"),
    ("ni", "color: #717171; font-weight: bold", "Name.Entity"),
    ("ne", "color: #CB3F38; font-weight: bold", "Name.Exception"),
    ("nf", "color: #0000FF", "Name.Function"),
    ("nl", "color: #767600", "Name.Label"),
    ("nn", "color: #0000FF; font-weight: bold", "Name.Namespace"),
    ("nt", "color: #008000; font-weight: bold", "Name.Tag"),
    ("nv", "color: #19177C", "Name.Variable"),
    ("ow", "color: #AA22FF; font-weight: bold", "Operator.Word"),
    ("w", "color: #bbbbbb", "Text.Whitespace"),
    ("mb", "color: #666666", "Literal.Number.Bin"),
    ("mf", "color: #666666", "Literal.Number.Float"),
    ("mh", "color: #666666", "Literal.Number.Hex"),
    ("mi", "color: #666666", "Literal.Number.Integer"),
    ("mo", "color: #666666", "Literal.Number.Oct"),
    ("sa", "color: #BA2121", "Literal.String.Affix"),
    ("sb", "color: #BA2121", "Literal.String.Backtick"),
    ("sc", "color: #BA2121", "Literal.String.Char"),
    ("dl", "color: #BA2121", "Literal.String.Delimiter"),
    ("sd", "color: #BA2121; font-style: italic", "Literal.String.Doc"),
    ("s2", "color: #BA2121", "Literal.String.Double"),
    ("se", "color: #AA5D1F; font-weight: bold", "Literal.String.Escape"),
    ("sh", "color: #BA2121", "Literal.String.Heredoc"),
    ("si", "color: #A45A77; font-weight: bold", "Literal.String.Interpol"),
    ("sx", "color: #008000", "Literal.String.Other"),
    ("sr", "color: #A45A77", "Literal.String.Regex"),
    ("s1", "color: #BA2121", "Literal.String.Single"),
    ("ss", "color: #19177C", "Literal.String.Symbol"),
    ("bp", "color: #008000", "Name.Builtin.Pseudo"),
    ("fm", "color: #0000FF", "Name.Function.Magic"),
    ("vc", "color: #19177C", "Name.Variable.Class"),
    ("vg", "color: #19177C", "Name.Variable.Global"),
    ("vi", "color: #19177C", "Name.Variable.Instance"),
    ("vm", "color: #19177C", "Name.Variable.Magic"),
    ("il", "color: #666666", "Literal.Number.Integer.Long"),
];

/// Build the highlighting stylesheet with every rule scoped to `selector`.
///
/// Returns an empty string for [`HighlightStyle::Disabled`]. Otherwise the
/// result ends with a newline, so it can be appended to other CSS directly.
///
/// # Example
///
/// ```
/// use markups::highlight::{HighlightStyle, stylesheet};
///
/// let css = stylesheet(".code", HighlightStyle::Default);
/// assert!(css.contains(".code .k { color: #008000; font-weight: bold } /* Keyword */"));
/// ```
#[must_use]
pub fn stylesheet(selector: &str, style: HighlightStyle) -> String {
    if style == HighlightStyle::Disabled {
        return String::new();
    }

    let mut css = String::with_capacity(DEFAULT_RULES.len() * 64);
    css.push_str(&format!("{selector} .hll {{ background-color: #ffffcc }}\n"));
    css.push_str(&format!("{selector} {{ background: #f8f8f8; }}\n"));
    for (class, declarations, token) in DEFAULT_RULES {
        css.push_str(&format!(
            "{selector} .{class} {{ {declarations} }} /* {token} */\n"
        ));
    }
    css
}

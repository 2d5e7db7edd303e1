//! Aligned option listing used by command help.

use super::FlagDefinition;

/// Render one line per flag: required flags first, each group sorted by long
/// name, descriptions aligned two spaces after the widest name column.
pub fn help_block(definitions: &[FlagDefinition]) -> String {
    let mut sorted: Vec<&FlagDefinition> = definitions.iter().collect();
    sorted.sort_by(|a, b| {
        a.optional
            .cmp(&b.optional)
            .then_with(|| a.long_name.cmp(&b.long_name))
    });

    let any_short = definitions.iter().any(|flag| flag.short_name.is_some());
    let rows: Vec<(String, &str)> = sorted
        .into_iter()
        .map(|flag| (name_column(flag, any_short), flag.description.as_str()))
        .collect();

    let width = rows
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);
    rows.iter()
        .map(|(name, description)| {
            let pad = width - name.chars().count();
            format!("{name}{}  {description}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn name_column(flag: &FlagDefinition, any_short: bool) -> String {
    let names = match (flag.short_name, any_short) {
        (Some(short), _) => format!("-{short}, --{}", flag.long_name),
        (None, true) => format!("    --{}", flag.long_name),
        (None, false) => format!("--{}", flag.long_name),
    };
    let argument = flag.argument_type();
    if flag.optional {
        format!("{names} [{argument}]")
    } else {
        format!("{names} <{argument}>")
    }
}

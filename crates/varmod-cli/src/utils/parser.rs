use varmod::core::models::selection::ResidueSelection;
use varmod::workflows::mutate::Substitution;

/// One mutation to build, fully resolved from a CLI spec or a job file.
#[derive(Debug, Clone)]
pub struct MutationRequest {
    pub selection: ResidueSelection,
    pub substitution: Substitution,
    pub label: Option<String>,
}

impl MutationRequest {
    /// The token used in output file names, e.g. `M64V`.
    pub fn tag(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!(
                "{}{}{}",
                one_letter(self.substitution.source()),
                self.selection.res_seq,
                one_letter(self.substitution.target()),
            ),
        }
    }
}

fn one_letter(res_name: &str) -> char {
    match res_name {
        "ALA" => 'A',
        "ARG" => 'R',
        "HIS" => 'H',
        "MET" => 'M',
        "THR" => 'T',
        "VAL" => 'V',
        _ => 'X',
    }
}

/// Parses a mutation spec of the form `CHAIN:RESSEQ[:ICODE]=FROM>TO`,
/// e.g. `m:64=MET>VAL` or `B:52:A=ALA>THR`.
pub fn parse_mutation_spec(spec: &str) -> Result<MutationRequest, String> {
    let (site, change) = spec
        .split_once('=')
        .ok_or_else(|| format!("Invalid mutation spec '{}': expected CHAIN:RESSEQ[:ICODE]=FROM>TO.", spec))?;

    let mut parts = site.split(':');
    let chain = parts
        .next()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| format!("Mutation spec '{}' is missing a chain id.", spec))?;
    let res_seq: isize = parts
        .next()
        .ok_or_else(|| format!("Mutation spec '{}' is missing a residue number.", spec))?
        .parse()
        .map_err(|_| format!("Mutation spec '{}' has a non-numeric residue number.", spec))?;
    let ins_code = match parts.next() {
        None => None,
        Some(icode) => {
            let mut chars = icode.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => {
                    return Err(format!(
                        "Mutation spec '{}' has an insertion code that is not a single character.",
                        spec
                    ));
                }
            }
        }
    };
    if parts.next().is_some() {
        return Err(format!("Mutation spec '{}' has too many ':' components.", spec));
    }

    let substitution: Substitution = change.parse().map_err(|e| format!("{}", e))?;

    Ok(MutationRequest {
        selection: ResidueSelection::new(chain, res_seq, ins_code),
        substitution,
        label: None,
    })
}

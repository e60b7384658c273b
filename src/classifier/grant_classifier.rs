use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::classifier::grant_type::{Field, GrantType};
use crate::classifier::params::GrantParameters;
use crate::error::GrantError;

/// Verified once per process: exact-set matching is only unambiguous while no
/// two grant types require the same fields.
static FIELD_SETS_DISTINCT: LazyLock<Result<(), GrantError>> =
    LazyLock::new(check_field_sets_distinct);

fn field_set(grant_type: GrantType) -> BTreeSet<Field> {
    grant_type.required_fields().iter().copied().collect()
}

/// Fail if two grant types share a required field set.
pub fn check_field_sets_distinct() -> Result<(), GrantError> {
    for (idx, first) in GrantType::ALL.iter().enumerate() {
        for second in &GrantType::ALL[idx + 1..] {
            if field_set(*first) == field_set(*second) {
                return Err(GrantError::AmbiguousGrantTypes {
                    first: *first,
                    second: *second,
                });
            }
        }
    }
    Ok(())
}

/// Deduce the single grant shape described by `params`.
///
/// The filled-in selector fields must equal one grant type's required fields
/// exactly. Membership grants never carry privileges; every other shape needs
/// at least one.
pub fn identify_grant_type(params: &GrantParameters) -> Result<GrantType, GrantError> {
    if let Err(err) = &*FIELD_SETS_DISTINCT {
        return Err(err.clone());
    }

    // Checked ahead of shape matching so the conflict is reported even when
    // other selectors are set too.
    if params.member_of.is_some() && !params.privileges.is_empty() {
        return Err(GrantError::MemberOfWithPrivileges);
    }

    let filled = params.filled_fields();
    let grant_type = GrantType::ALL
        .into_iter()
        .find(|grant_type| field_set(*grant_type) == filled)
        .ok_or(GrantError::UnidentifiedGrantType)?;

    if grant_type != GrantType::RoleMember && params.privileges.is_empty() {
        return Err(GrantError::NoPrivileges);
    }

    tracing::trace!(%grant_type, "identified grant type");
    Ok(grant_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_field_sets_are_distinct() {
        assert_eq!(check_field_sets_distinct(), Ok(()));
    }

    #[test]
    fn empty_parameters_match_nothing() {
        assert_eq!(
            identify_grant_type(&GrantParameters::default()),
            Err(GrantError::UnidentifiedGrantType)
        );
    }
}

use std::collections::BTreeSet;

/// `MySQL` reports `ALL` and accepts both spellings.
const ALL_PRIVILEGES: &str = "ALL PRIVILEGES";
const ALL: &str = "ALL";

fn normalize<S: AsRef<str>>(privileges: &[S]) -> BTreeSet<String> {
    privileges
        .iter()
        .map(|privilege| privilege.as_ref().trim().to_uppercase())
        .filter(|privilege| !privilege.is_empty())
        .map(|privilege| {
            if privilege == ALL_PRIVILEGES {
                ALL.to_string()
            } else {
                privilege
            }
        })
        .collect()
}

/// Split the difference between the declared and the observed privileges of a
/// `MySQL` grant into `(to_grant, to_revoke)`, both sorted ascending.
///
/// Two empty vectors mean the grant is up to date.
pub fn diff_privileges<D, O>(desired: &[D], observed: &[O]) -> (Vec<String>, Vec<String>)
where
    D: AsRef<str>,
    O: AsRef<str>,
{
    let desired = normalize(desired);
    let observed = normalize(observed);
    let to_grant = desired.difference(&observed).cloned().collect();
    let to_revoke = observed.difference(&desired).cloned().collect();
    (to_grant, to_revoke)
}

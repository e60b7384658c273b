mod support;

use sqlgrants::generator::mysql::{MySqlGrant, MySqlObject};
use sqlgrants::generator::statement::Statement;
use sqlgrants::{GrantError, MySqlGrantParameters};
use support::{mysql_grant, privileges};

fn sql(statements: &[Statement]) -> Vec<&str> {
    statements.iter().map(|s| s.sql.as_str()).collect()
}

#[test]
fn create_is_a_single_grant_followed_by_flush() {
    let params = mysql_grant("app@10.0.%", "shop", Some("orders"), &["SELECT", "INSERT"]);
    let grant = MySqlGrant::new(&params).unwrap();
    assert_eq!(
        sql(&grant.create_queries()),
        vec![
            "GRANT SELECT, INSERT ON `shop`.`orders` TO 'app'@'10.0.%'",
            "FLUSH PRIVILEGES",
        ]
    );
}

#[test]
fn disabled_binlog_prefixes_every_change() {
    let mut params = mysql_grant("app", "shop", None, &["SELECT"]);
    params.binlog = Some(false);
    let grant = MySqlGrant::new(&params).unwrap();
    assert_eq!(
        sql(&grant.delete_queries()),
        vec![
            "SET sql_log_bin = 0",
            "REVOKE SELECT ON `shop`.* FROM 'app'@'%'",
            "FLUSH PRIVILEGES",
        ]
    );
}

#[test]
fn update_revokes_before_granting() {
    let grant = MySqlGrant::new(&mysql_grant("app", "shop", None, &["SELECT", "UPDATE"])).unwrap();
    let observed = vec!["SELECT".to_string(), "DELETE".to_string()];
    assert_eq!(
        sql(&grant.update_queries(&observed)),
        vec![
            "REVOKE DELETE ON `shop`.* FROM 'app'@'%'",
            "GRANT UPDATE ON `shop`.* TO 'app'@'%'",
            "FLUSH PRIVILEGES",
        ]
    );
}

#[test]
fn lowercase_privileges_are_rejected() {
    assert!(matches!(
        sqlgrants::Privilege::new("select"),
        Err(GrantError::InvalidPrivilege { .. })
    ));
}

#[test]
fn update_with_nothing_to_change_is_empty() {
    let grant = MySqlGrant::new(&mysql_grant("app", "shop", None, &["SELECT", "DROP"])).unwrap();
    assert!(grant.update_queries(&["DROP", "SELECT"]).is_empty());
}

#[test]
fn show_grants_targets_the_account() {
    let grant = MySqlGrant::new(&mysql_grant("o'neil", "shop", None, &["SELECT"])).unwrap();
    assert_eq!(
        grant.show_grants_query().sql,
        "SHOW GRANTS FOR 'o''neil'@'%'"
    );
}

#[test]
fn identifiers_are_backtick_quoted() {
    let grant =
        MySqlGrant::new(&mysql_grant("app", "sh`op", Some("*"), &["SELECT"])).unwrap();
    assert_eq!(grant.database(), &MySqlObject::Named("sh`op".to_string()));
    assert_eq!(grant.table(), &MySqlObject::Any);
    assert_eq!(
        grant.create_query().sql,
        "GRANT SELECT ON `sh``op`.* TO 'app'@'%'"
    );
}

#[test]
fn global_grants_use_wildcards() {
    let params = MySqlGrantParameters {
        user: Some("repl@%".to_string()),
        privileges: privileges(&["REPLICATION SLAVE"]),
        ..Default::default()
    };
    let grant = MySqlGrant::new(&params).unwrap();
    assert_eq!(
        grant.create_query().sql,
        "GRANT REPLICATION SLAVE ON *.* TO 'repl'@'%'"
    );
}

#[test]
fn user_and_privileges_are_required() {
    let mut params = mysql_grant("app", "shop", None, &["SELECT"]);
    params.user = None;
    let err = MySqlGrant::new(&params).unwrap_err();
    assert_eq!(err, GrantError::MissingField("user"));
    assert_eq!(err.to_string(), "user not passed");

    let params = mysql_grant("app", "shop", None, &[]);
    assert_eq!(MySqlGrant::new(&params), Err(GrantError::NoPrivileges));
}

//! First-run seeding — base role, department, and the menu/permission
//! catalog. Safe to run on every startup; existing rows are left alone.

use crate::db::SystemDb;
use crate::depts::DeptData;
use crate::menus::MenuData;
use crate::roles::RoleData;
use crate::users::UserData;
use adminkit_core::error::Result;
use tracing::info;

/// Subsystems that get a menu plus query/create/update/delete buttons.
const SYSTEM_SECTIONS: &[(&str, &str)] = &[
    ("User", "user"),
    ("Role", "role"),
    ("Menu", "menu"),
    ("Dept", "dept"),
    ("Post", "post"),
    ("Tenant", "tenant"),
    ("Config", "config"),
    ("Notice", "notice"),
    ("Dict", "dict"),
];

const MONITOR_SECTIONS: &[(&str, &str)] = &[
    ("Login log", "monitor:login-log:query"),
    ("Operate log", "monitor:operate-log:query"),
    ("Server", "monitor:server:query"),
];

/// Ensure the base rows exist: `super_admin` role, root department, and the
/// permission catalog. Detection is by the first user-query permission, so
/// the whole catalog is created in one pass or not at all.
pub fn ensure_defaults(db: &SystemDb) -> Result<()> {
    if db.find_role_by_code(super_admin_code())?.is_none() {
        db.create_role(&RoleData {
            name: "Super Administrator".into(),
            code: super_admin_code().into(),
            sort: 1,
            role_type: 1,
            remark: Some("Built-in role with every permission".into()),
            ..Default::default()
        })?;
        info!("seeded super_admin role");
    }

    if db.list_depts()?.is_empty() {
        db.create_dept(&DeptData { name: "Headquarters".into(), sort: 1, ..Default::default() })?;
        info!("seeded root department");
    }

    if db.find_menu_by_permission("system:user:query")?.is_none() {
        seed_menus(db)?;
        info!("seeded menu and permission catalog");
    }

    Ok(())
}

fn seed_menus(db: &SystemDb) -> Result<()> {
    let system_dir = db.create_menu(&MenuData {
        name: "System Management".into(),
        menu_type: 1,
        sort: 1,
        path: "/system".into(),
        ..Default::default()
    })?;

    for (index, (name, slug)) in SYSTEM_SECTIONS.iter().enumerate() {
        let menu = db.create_menu(&MenuData {
            name: (*name).into(),
            permission: format!("system:{slug}:query"),
            menu_type: 2,
            sort: index as i64 + 1,
            parent_id: system_dir.id.clone(),
            path: format!("/system/{slug}"),
            ..Default::default()
        })?;
        for (action_index, action) in ["create", "update", "delete"].iter().enumerate() {
            db.create_menu(&MenuData {
                name: format!("{name} {action}"),
                permission: format!("system:{slug}:{action}"),
                menu_type: 3,
                sort: action_index as i64 + 1,
                parent_id: menu.id.clone(),
                ..Default::default()
            })?;
        }
    }

    let monitor_dir = db.create_menu(&MenuData {
        name: "Monitoring".into(),
        menu_type: 1,
        sort: 2,
        path: "/monitor".into(),
        ..Default::default()
    })?;
    for (index, (name, permission)) in MONITOR_SECTIONS.iter().enumerate() {
        db.create_menu(&MenuData {
            name: (*name).into(),
            permission: (*permission).into(),
            menu_type: 2,
            sort: index as i64 + 1,
            parent_id: monitor_dir.id.clone(),
            ..Default::default()
        })?;
    }

    Ok(())
}

/// Create the admin account if it does not exist, holding the
/// `super_admin` role. The caller supplies an already-hashed password.
pub fn ensure_admin(db: &SystemDb, username: &str, password_hash: &str) -> Result<bool> {
    if db.find_user_by_username(username)?.is_some() {
        return Ok(false);
    }

    ensure_defaults(db)?;
    let user = db.create_user(
        &UserData {
            username: username.into(),
            nickname: "Administrator".into(),
            ..Default::default()
        },
        password_hash,
    )?;

    if let Some(role) = db.find_role_by_code(super_admin_code())? {
        db.assign_user_roles(&user.id, &[role.id])?;
    }
    info!(username, "seeded admin account");
    Ok(true)
}

// mirrors adminkit_auth::SUPER_ADMIN_ROLE without taking the dependency
fn super_admin_code() -> &'static str {
    "super_admin"
}

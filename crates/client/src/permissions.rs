use api_types::membership::Role;

/// Capability matrix per budget role.
///
/// Roles are strictly ordered (owner ⊇ manager ⊇ contributor ⊇ viewer);
/// member management and budget deletion stay with the owner, settings reach
/// down to managers, entry writes down to contributors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BudgetPermissions {
    pub can_view: bool,
    pub can_add_entries: bool,
    pub can_edit_entries: bool,
    pub can_manage_categories: bool,
    pub can_view_members: bool,
    pub can_manage_members: bool,
    pub can_manage_settings: bool,
    pub can_delete_budget: bool,
}

impl BudgetPermissions {
    pub fn for_role(role: Role) -> Self {
        Self {
            can_view: true,
            can_add_entries: role.at_least(Role::Contributor),
            can_edit_entries: role.at_least(Role::Contributor),
            can_manage_categories: role.at_least(Role::Manager),
            can_view_members: role == Role::Owner,
            can_manage_members: role == Role::Owner,
            can_manage_settings: role.at_least(Role::Manager),
            can_delete_budget: role == Role::Owner,
        }
    }
}

/// Which budget tabs a role may open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TabPermissions {
    pub overview: bool,
    pub categories: bool,
    pub entries: bool,
    pub members: bool,
    pub summary: bool,
    pub settings: bool,
}

impl TabPermissions {
    pub fn for_role(role: Role) -> Self {
        let permissions = BudgetPermissions::for_role(role);
        Self {
            overview: permissions.can_view,
            categories: permissions.can_view,
            entries: permissions.can_view,
            members: permissions.can_view_members,
            summary: permissions.can_view,
            settings: permissions.can_manage_settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_shrink_monotonically_down_the_role_order() {
        let owner = BudgetPermissions::for_role(Role::Owner);
        let manager = BudgetPermissions::for_role(Role::Manager);
        let contributor = BudgetPermissions::for_role(Role::Contributor);
        let viewer = BudgetPermissions::for_role(Role::Viewer);

        assert!(owner.can_delete_budget && owner.can_manage_members);
        assert!(manager.can_manage_settings && !manager.can_manage_members);
        assert!(contributor.can_add_entries && !contributor.can_manage_categories);
        assert!(viewer.can_view && !viewer.can_add_entries);
    }

    #[test]
    fn members_tab_is_owner_only() {
        assert!(TabPermissions::for_role(Role::Owner).members);
        assert!(!TabPermissions::for_role(Role::Manager).members);
        assert!(!TabPermissions::for_role(Role::Viewer).members);
    }

    #[test]
    fn settings_tab_reaches_managers() {
        assert!(TabPermissions::for_role(Role::Manager).settings);
        assert!(!TabPermissions::for_role(Role::Contributor).settings);
    }
}

//! Shared test utilities for planner-db unit tests.

pub(crate) mod helpers {
    use planner_core::entities::{Employee, Initiative};

    use crate::PlannerDb;
    use crate::repos::employee::NewEmployee;
    use crate::repos::initiative::NewInitiative;
    use crate::service::PlannerService;

    pub const ACTOR: &str = "emp-tester";

    /// Create an in-memory `PlannerService`.
    pub async fn test_service() -> PlannerService {
        let db = PlannerDb::open_local(":memory:").await.unwrap();
        PlannerService::from_db(db)
    }

    /// Create an employee with a unique email derived from `name`.
    pub async fn seed_employee(svc: &PlannerService, name: &str) -> Employee {
        svc.create_employee(
            ACTOR,
            NewEmployee {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                title: None,
                department: None,
            },
        )
        .await
        .unwrap()
    }

    /// Create an initiative owned by a fresh employee.
    pub async fn seed_initiative(svc: &PlannerService, title: &str) -> Initiative {
        let owner = seed_employee(svc, &format!("Owner {title}")).await;
        svc.create_initiative(
            ACTOR,
            NewInitiative {
                title: title.to_string(),
                description: None,
                owner_id: owner.id,
                formation_id: None,
                milestone: None,
                product: None,
            },
        )
        .await
        .unwrap()
    }
}

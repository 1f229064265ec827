use scenario_engine::prelude::*;
use scenario_engine::reference::{
    CachingSimulator, CatalogProposer, MonteCarloSimulator, RetryingProposer, ValidatingProposer,
};
use scenario_test_utils::{action, baseline, config, goal, ScriptedProposer, ScriptedSimulator};
use std::sync::Arc;

fn reference_driver() -> BeamSearchDriver {
    let catalog = Arc::new(ActionCatalog::builtin().unwrap());
    let proposer = RetryingProposer::new(CatalogProposer::new(Arc::clone(&catalog), 3), 2);
    BeamSearchDriver::new(
        Arc::new(ValidatingProposer::new(proposer, catalog)),
        Arc::new(CachingSimulator::new(MonteCarloSimulator::new(), 1_000)),
    )
}

async fn run_once(seed: u64) -> ExplorationSession {
    let mut session = ExplorationSession::start(
        "exp-ref",
        &baseline(),
        goal(0.7),
        config(3, 5, 40)
            .with_executions(2_000)
            .with_seed(Some(seed)),
    )
    .unwrap();
    reference_driver().run(&mut session).await.unwrap();
    session
}

#[tokio::test]
async fn reference_collaborators_are_reproducible() {
    let a = run_once(1234).await;
    let b = run_once(1234).await;

    assert!(a.is_terminal());
    assert_eq!(a.tree().fingerprint(), b.tree().fingerprint());
    assert_eq!(a.exploration().status(), b.exploration().status());
}

#[tokio::test]
async fn catalog_actions_improve_on_the_baseline() {
    let session = run_once(7).await;
    let best = session.exploration().best_success_rate.unwrap();
    assert!(best >= baseline().outcome.success_rate);

    let catalog = ActionCatalog::builtin().unwrap();
    for node in session.tree().iter().filter(|n| !n.is_root()) {
        let category = node.action_category.as_deref().unwrap();
        assert!(catalog.category(category).is_some());
    }
}

#[tokio::test]
async fn off_catalog_proposals_never_reach_the_tree() {
    let catalog = Arc::new(ActionCatalog::builtin().unwrap());
    let known = ProposedAction::new(
        "guided setup",
        "onboarding",
        "guided setup rationale",
        ScorecardDelta::new().with_initial_effort(-0.1),
    );
    let unknown = action("discount", ScorecardDelta::new().with_perceived_risk(-0.1));
    let driver = BeamSearchDriver::new(
        Arc::new(ValidatingProposer::new(
            ScriptedProposer::fixed(vec![known, unknown]),
            catalog,
        )),
        Arc::new(ScriptedSimulator::constant(0.5)),
    );

    let mut session =
        ExplorationSession::start("exp-ref", &baseline(), goal(0.9), config(3, 1, 10)).unwrap();
    let report = driver.step(&mut session).await.unwrap();

    assert_eq!(report.children, 1);
    assert_eq!(report.proposal_failures, 0);
    let child = session.tree().iter().find(|n| !n.is_root()).unwrap();
    assert_eq!(child.action_category.as_deref(), Some("onboarding"));
}

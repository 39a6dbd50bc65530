use super::*;

#[test]
fn test_intro_next_atomic_goal_is_done() {
    let mut backend = TestBackend::new();
    let goal = backend.goal(c("Q"));
    let mvar = goal.mvar;

    let step = Grind::new(&mut backend).intro_next(goal, 0).unwrap();
    match step {
        IntroStep::Done(goal) => {
            assert_eq!(goal.mvar, mvar);
            assert_eq!(goal.target, c("Q"));
        }
        other => panic!("expected Done, got {other:?}"),
    }
    assert!(backend.assignment(mvar).is_none());
}

#[test]
fn test_intro_next_implication() {
    let mut backend = TestBackend::new();
    let goal = backend.goal(Expr::arrow(c("P"), c("Q")));
    let old = goal.mvar;

    let step = Grind::new(&mut backend).intro_next(goal, 0).unwrap();
    let IntroStep::NewHyp { fvar, goal } = step else {
        panic!("expected NewHyp");
    };
    assert_eq!(goal.target, c("Q"));
    let decl = goal.lctx.find(fvar).unwrap();
    assert_eq!(decl.ty, c("P"));
    assert_eq!(decl.user_name.erase_macro_scopes(), Name::from_string("h"));
    assert_eq!(
        backend.assignment(old),
        Some(&Expr::lam(BinderInfo::Default, c("P"), Expr::mvar(goal.mvar)))
    );
}

#[test]
fn test_intro_next_simplifies_antecedent() {
    let mut backend = TestBackend::new().with_rule(c("P"), c("P'"));
    let goal = backend.goal(Expr::arrow(c("P"), c("Q")));
    let old = goal.mvar;

    let IntroStep::NewHyp { fvar, goal } = Grind::new(&mut backend).intro_next(goal, 0).unwrap()
    else {
        panic!("expected NewHyp");
    };
    assert_eq!(goal.lctx.find(fvar).unwrap().ty, c("P'"));
    let proof = backend.assignment(old).unwrap();
    assert!(proof.is_app_of(&Name::from_string(proof::INTRO_WITH_EQ), 5));
    assert_eq!(proof.get_app_args()[3], &simp_proof(&c("P")));
}

#[test]
fn test_dependent_hypothesis_keeps_its_type() {
    let mut backend = TestBackend::new().with_rule(c("P"), c("P'"));
    // ∀ h : P, Q h
    let target = Expr::pi(
        BinderInfo::Default,
        c("P"),
        Expr::app(c("Q"), Expr::bvar(0)),
    );
    let goal = backend.goal(target);

    let IntroStep::NewHyp { fvar, goal } = Grind::new(&mut backend).intro_next(goal, 0).unwrap()
    else {
        panic!("expected NewHyp");
    };
    assert_eq!(goal.lctx.find(fvar).unwrap().ty, c("P"));
    assert_eq!(goal.target, Expr::app(c("Q"), Expr::fvar(fvar)));
}

#[test]
fn test_intro_next_non_prop_binder() {
    let mut backend = TestBackend::new();
    let target = Expr::pi(
        BinderInfo::Implicit,
        c("Nat"),
        Expr::app(c("Q"), Expr::bvar(0)),
    );
    let goal = backend.goal(target);

    let IntroStep::NewLocal { fvar, goal } = Grind::new(&mut backend).intro_next(goal, 0).unwrap()
    else {
        panic!("expected NewLocal");
    };
    let decl = goal.lctx.find(fvar).unwrap();
    assert_eq!(decl.ty, c("Nat"));
    assert_eq!(decl.binder_info, BinderInfo::Implicit);
    assert_eq!(decl.user_name.erase_macro_scopes(), Name::from_string("x"));
    assert_eq!(goal.target, Expr::app(c("Q"), Expr::fvar(fvar)));
    assert!(backend.registered.is_empty());
}

#[test]
fn test_let_registers_definitional_equation() {
    let mut backend = TestBackend::new().with_rule(c("e"), c("e'"));
    let target = Expr::let_(c("Nat"), c("e"), Expr::app(c("Q"), Expr::bvar(0)));
    let goal = backend.goal(target);
    let old = goal.mvar;

    let IntroStep::NewLocal { fvar, goal } = Grind::new(&mut backend).intro_next(goal, 3).unwrap()
    else {
        panic!("expected NewLocal");
    };
    let x = Expr::fvar(fvar);
    assert_eq!(goal.lctx.find(fvar).unwrap().value, Some(c("e")));
    assert_eq!(goal.target, Expr::app(c("Q"), x.clone()));
    assert_eq!(
        backend.registered,
        vec![Registered {
            prop: mk_eq(Level::one(), c("Nat"), x.clone(), c("e'")),
            proof: simp_proof(&c("e")),
            generation: 3,
        }]
    );
    assert_eq!(goal.cc.shared, vec![x]);
    assert_eq!(
        backend.assignment(old),
        Some(&Expr::let_(c("Nat"), c("e"), Expr::mvar(goal.mvar)))
    );
}

#[test]
fn test_let_without_rewrite_uses_refl() {
    let mut backend = TestBackend::new();
    let target = Expr::let_(c("Nat"), c("e"), c("Q"));
    let goal = backend.goal(target);

    let IntroStep::NewLocal { fvar, .. } = Grind::new(&mut backend).intro_next(goal, 0).unwrap()
    else {
        panic!("expected NewLocal");
    };
    let refl = proof::mk_eq_refl(Level::one(), c("Nat"), Expr::fvar(fvar));
    assert_eq!(backend.registered[0].proof, refl);
}

#[test]
fn test_let_fun_binds_like_let() {
    let mut backend = TestBackend::new();
    let target = Expr::let_fun(
        c("Nat"),
        Expr::prop(),
        c("e"),
        Expr::app(c("Q"), Expr::bvar(0)),
    );
    let goal = backend.goal(target);
    let old = goal.mvar;

    let IntroStep::NewLocal { fvar, goal } = Grind::new(&mut backend).intro_next(goal, 0).unwrap()
    else {
        panic!("expected NewLocal");
    };
    assert_eq!(goal.target, Expr::app(c("Q"), Expr::fvar(fvar)));
    assert_eq!(
        backend.registered_props(),
        vec![mk_eq(Level::one(), c("Nat"), Expr::fvar(fvar), c("e"))]
    );
    let proof = backend.assignment(old).unwrap();
    assert!(proof.as_let_fun().is_some());
}

#[test]
fn test_let_bound_proof_is_queued() {
    let mut backend = TestBackend::new();
    let target = Expr::let_(c("P"), c("p"), c("Q"));
    let goal = backend.goal(target);

    let step = Grind::new(&mut backend).intro_next(goal, 1).unwrap();
    let IntroStep::NewDepHyp(goal) = step else {
        panic!("expected NewDepHyp");
    };
    let x = goal.lctx.last().unwrap().fvar;
    let queued: Vec<_> = goal.facts.iter().cloned().collect();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].prop, c("P"));
    assert_eq!(queued[0].proof, Expr::fvar(x));
    assert_eq!(queued[0].generation, 1);
    assert!(backend.registered.is_empty());
}

#[test]
fn test_decompose_queues_plain_hypothesis() {
    let mut backend = TestBackend::new();
    let goal = backend.goal(Expr::arrow(c("P"), c("Q")));

    let result = Grind::new(&mut backend).decompose(goal, 0).unwrap();
    let Decomposition::Split(goal) = result else {
        panic!("expected Split");
    };
    assert_eq!(goal.facts.len(), 1);
    assert_eq!(goal.facts.iter().next().unwrap().prop, c("P"));
    assert_eq!(goal.target, c("Q"));
}

#[test]
fn test_decompose_done_does_not_touch_goal() {
    let mut backend = TestBackend::new();
    let goal = backend.goal(c("Q"));
    let mvar = goal.mvar;
    let mvars_before = backend.metas.num_mvars();

    let result = Grind::new(&mut backend).decompose(goal, 0).unwrap();
    let Decomposition::Done(goal) = result else {
        panic!("expected Done");
    };
    assert_eq!(goal.mvar, mvar);
    assert_eq!(goal.target, c("Q"));
    assert!(goal.lctx.is_empty());
    assert_eq!(backend.metas.num_mvars(), mvars_before);
}

#[test]
fn test_by_contra_negates_conclusion() {
    let mut backend = TestBackend::new();
    let goal = backend.goal(c("P"));
    let old = goal.mvar;

    let config = GrindConfig::new().with_by_contra(true);
    let result = Grind::with_config(&mut backend, config)
        .decompose(goal, 0)
        .unwrap();
    let Decomposition::Split(goal) = result else {
        panic!("expected Split");
    };
    assert_eq!(
        goal.target,
        Expr::arrow(proof::mk_not(c("P")), proof::mk_false())
    );
    assert_eq!(
        backend.assignment(old),
        Some(&proof::mk_by_contra(c("P"), Expr::mvar(goal.mvar)))
    );
}

#[test]
fn test_by_contra_leaves_false_and_non_props() {
    let config = GrindConfig::new().with_by_contra(true);
    for target in [proof::mk_false(), c("Nat")] {
        let mut backend = TestBackend::new();
        let goal = backend.goal(target);
        let result = Grind::with_config(&mut backend, config.clone())
            .decompose(goal, 0)
            .unwrap();
        assert!(matches!(result, Decomposition::Done(_)));
    }
}

#[test]
fn test_elaborator_failure_propagates() {
    let mut backend = TestBackend::new();
    let goal = backend.goal(Expr::arrow(c("P"), c("Q")));
    backend.fail_mvars = true;

    let err = Grind::new(&mut backend).decompose(goal, 0).unwrap_err();
    assert!(matches!(err, GrindError::Elaborator(_)));
}

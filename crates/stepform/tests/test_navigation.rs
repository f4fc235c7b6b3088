//! Integration tests for step navigation.

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use stepform::{
        ButtonKind, DenyReason, Event, Form, Level, MoveOutcome, MoveRequest, Position, StepMode,
        error::Result,
        layout::{
            ButtonLayout, CardLayout, FieldLayout, FormLayout, GroupLayout, InputLayout, SetLayout,
        },
        tutils::{
            fixtures::{self, grid_input},
            harness::Harness,
        },
    };

    /// Every level below `level` has one current item whose parent is the
    /// current item above it, unless the parent has no children there. Every
    /// level above mirrors the target's parent pointers.
    fn assert_cascade(form: &Form, level: Level) {
        let pos = Position::of(form);
        let target = pos.get(level).unwrap();
        let parents = form.registry(level).parents_at(target).unwrap();
        for a in level.ancestors() {
            assert_eq!(pos.get(a), parents.index_of(a), "{a} above {level}");
        }
        let mut above = (level, target);
        for below in level.descendants() {
            let reg = form.registry(below);
            let parent_of = |i: usize| reg.parents_at(i).and_then(|p| p.index_of(above.0));
            match pos.get(below) {
                Some(c) => {
                    assert_eq!(parent_of(c), Some(above.1), "{below} under {}", above.0);
                    above = (below, c);
                }
                None => assert!(
                    !(0..reg.len()).any(|i| parent_of(i) == Some(above.1)),
                    "{below} has children but nothing current"
                ),
            }
        }
    }

    fn three_fields() -> FormLayout {
        let field = |id: &str| FieldLayout::new(id).input(InputLayout::new(&format!("{id}-i")));
        FormLayout::new().card(
            CardLayout::new("only")
                .set(
                    SetLayout::new("s").group(
                        GroupLayout::new("g")
                            .field(field("a"))
                            .field(field("b"))
                            .field(field("c")),
                    ),
                )
                .button(ButtonLayout::new("submit", ButtonKind::Submit)),
        )
    }

    #[test]
    fn field_mode_terminates_on_third_next() -> Result<()> {
        let mut h = Harness::builder(three_fields())
            .step_mode(StepMode::Field)
            .build()?;
        assert_eq!(h.current(Level::Field).as_deref(), Some("a"));

        h.next()?;
        assert_eq!(
            h.last_move(),
            Some(MoveOutcome::Moved {
                level: Level::Field,
                index: 1
            })
        );
        h.next()?;
        assert_eq!(h.current(Level::Field).as_deref(), Some("c"));
        assert_eq!(
            h.navigation_events(),
            vec![
                Event::NavigationChanged {
                    target: Level::Field
                },
                Event::NavigationChanged {
                    target: Level::Field
                }
            ]
        );

        let before = h.controller.form().clone();
        h.next()?;
        assert_eq!(h.last_move(), Some(MoveOutcome::Terminal));
        assert!(h.navigation_events().is_empty());
        assert_eq!(h.controller.form(), &before);
        Ok(())
    }

    #[test]
    fn starts_on_a_fieldless_first_card() -> Result<()> {
        let layout = FormLayout::new()
            .card(CardLayout::new("intro").button(ButtonLayout::new("intro-next", ButtonKind::Next)))
            .card(
                CardLayout::new("details")
                    .set(
                        SetLayout::new("s").group(
                            GroupLayout::new("g")
                                .field(FieldLayout::new("f").input(InputLayout::new("f-i"))),
                        ),
                    )
                    .button(ButtonLayout::new("details-submit", ButtonKind::Submit)),
            );
        let mut h = Harness::builder(layout).step_mode(StepMode::Field).build()?;
        assert_eq!(
            h.last_move(),
            Some(MoveOutcome::Moved {
                level: Level::Card,
                index: 0
            })
        );
        assert_eq!(h.current(Level::Card).as_deref(), Some("intro"));
        assert_eq!(
            h.position(),
            Position {
                card: Some(0),
                ..Position::default()
            }
        );
        assert!(h.controller.buttons().get("intro-next").unwrap().is_bound());

        h.click("intro-next")?;
        assert_eq!(h.current(Level::Card).as_deref(), Some("details"));
        assert_eq!(h.current(Level::Field).as_deref(), Some("f"));
        Ok(())
    }

    #[test]
    fn card_mode_gates_on_invalid_input() -> Result<()> {
        let mut h = Harness::new(fixtures::grid(2, 2, 2, 1))?;
        h.set_valid(&grid_input(0, 0, 0, 0), false)?;
        h.events();

        let before = h.controller.form().clone();
        h.next()?;
        assert_eq!(
            h.navigation_events(),
            vec![Event::NavigationDenied {
                reason: DenyReason::Invalid
            }]
        );
        assert_eq!(h.controller.form(), &before);

        h.set_valid(&grid_input(0, 0, 0, 0), true)?;
        h.next()?;
        assert_eq!(h.current(Level::Card).as_deref(), Some("card-1"));
        assert_eq!(h.active(Level::Card), vec!["card-1"]);
        assert_eq!(h.active(Level::Set), vec!["card-1-set-0", "card-1-set-1"]);
        for level in [Level::Group, Level::Field, Level::Input] {
            assert!(
                h.active(level).iter().all(|id| id.starts_with("card-1-")),
                "{level} still has card-0 items active"
            );
        }
        assert_cascade(h.controller.form(), Level::Card);
        Ok(())
    }

    #[test]
    fn cascade_is_complete_at_every_step_mode() -> Result<()> {
        for mode in [StepMode::Field, StepMode::Group, StepMode::Set, StepMode::Card] {
            let mut h = Harness::builder(fixtures::grid(2, 2, 2, 2))
                .step_mode(mode)
                .build()?;
            loop {
                h.next()?;
                match h.last_move() {
                    Some(MoveOutcome::Moved { level, .. }) => {
                        assert_eq!(level, mode.level());
                        assert_cascade(h.controller.form(), level);
                        let pos = h.position();
                        for l in Level::ALL {
                            assert!(pos.get(l).is_some(), "{mode}: no current {l}");
                        }
                    }
                    _ => break,
                }
            }
            loop {
                h.prev()?;
                match h.last_move() {
                    Some(MoveOutcome::Moved { level, .. }) => assert_cascade(h.controller.form(), level),
                    _ => break,
                }
            }
            assert_eq!(h.position().card, Some(0));
        }
        Ok(())
    }

    #[test]
    fn field_steps_walk_document_order() -> Result<()> {
        let mut h = Harness::builder(fixtures::grid(2, 1, 2, 2))
            .step_mode(StepMode::Field)
            .build()?;
        let mut seen = vec![h.current(Level::Field).unwrap()];
        loop {
            h.next()?;
            if h.last_move() == Some(MoveOutcome::Terminal) {
                break;
            }
            seen.push(h.current(Level::Field).unwrap());
        }
        assert_eq!(seen.len(), 8);
        assert_eq!(seen[4], "card-1-set-0-group-0-field-0");
        assert_eq!(h.active(Level::Field), vec!["card-1-set-0-group-1-field-1"]);
        Ok(())
    }

    #[test]
    fn falls_through_to_cards_without_fields() -> Result<()> {
        let mut h = Harness::builder(fixtures::signup())
            .step_mode(StepMode::Field)
            .build()?;
        for _ in 0..5 {
            h.next()?;
        }
        assert_eq!(h.current(Level::Field).as_deref(), Some("newsletter"));

        h.next()?;
        assert_eq!(
            h.last_move(),
            Some(MoveOutcome::Moved {
                level: Level::Card,
                index: 2
            })
        );
        assert_eq!(
            h.position(),
            Position {
                card: Some(2),
                ..Position::default()
            }
        );
        h.events();

        h.next()?;
        assert_eq!(h.last_move(), Some(MoveOutcome::Terminal));
        assert!(h.events().is_empty());

        // With no current field the coarser levels resolve, and the cascade
        // lands on the first field of the previous card.
        h.prev()?;
        assert_eq!(
            h.last_move(),
            Some(MoveOutcome::Moved {
                level: Level::Card,
                index: 1
            })
        );
        assert_eq!(h.current(Level::Field).as_deref(), Some("bio"));
        Ok(())
    }

    #[test]
    fn prev_is_not_gated() -> Result<()> {
        let mut h = Harness::builder(fixtures::grid(1, 1, 1, 3))
            .step_mode(StepMode::Field)
            .build()?;
        h.next()?;
        h.set_valid(&grid_input(0, 0, 0, 1), false)?;
        h.next()?;
        assert_eq!(h.last_move(), Some(MoveOutcome::Denied(DenyReason::Invalid)));
        h.prev()?;
        assert_eq!(
            h.last_move(),
            Some(MoveOutcome::Moved {
                level: Level::Field,
                index: 0
            })
        );
        Ok(())
    }

    #[test]
    fn excluded_inputs_never_gate() -> Result<()> {
        let mut h = Harness::builder(fixtures::signup())
            .step_mode(StepMode::Group)
            .build()?;
        h.next()?;
        h.next()?;
        assert_eq!(h.current(Level::Group).as_deref(), Some("bio"));
        assert_eq!(h.active(Level::Input), vec!["bio-input", "website-input"]);
        assert_eq!(h.current(Level::Input).as_deref(), Some("bio-input"));

        h.set_valid("website-input", false)?;
        assert!(!h.controller.buttons().get("profile-next").unwrap().is_disabled());

        h.set_included("website-input", true)?;
        assert!(h.controller.buttons().get("profile-next").unwrap().is_disabled());
        h.events();
        h.next()?;
        assert_eq!(
            h.navigation_events(),
            vec![Event::NavigationDenied {
                reason: DenyReason::Invalid
            }]
        );

        h.set_included("website-input", false)?;
        h.next()?;
        assert_eq!(h.current(Level::Group).as_deref(), Some("newsletter"));
        Ok(())
    }

    #[test]
    fn submit_matches_card_next() -> Result<()> {
        let mut by_submit = Harness::builder(fixtures::grid(3, 2, 2, 2))
            .step_mode(StepMode::Group)
            .build()?;
        let mut by_next = Harness::new(fixtures::grid(3, 2, 2, 2))?;

        by_submit.submit()?;
        by_next.next()?;
        assert_eq!(by_submit.controller.form(), by_next.controller.form());
        assert_eq!(by_submit.navigation_events(), by_next.navigation_events());

        by_submit.submit()?;
        by_next.next()?;
        assert_eq!(by_submit.controller.form(), by_next.controller.form());
        by_submit.events();
        by_next.events();

        by_submit.submit()?;
        by_next.next()?;
        assert_eq!(by_submit.last_move(), Some(MoveOutcome::Terminal));
        assert_eq!(by_next.last_move(), Some(MoveOutcome::Terminal));
        assert_eq!(by_submit.controller.form(), by_next.controller.form());
        assert_eq!(by_submit.navigation_events(), vec![Event::SubmitRequest]);
        assert!(by_next.navigation_events().is_empty());
        Ok(())
    }

    #[test]
    fn disabled_navigation_denies_everything() -> Result<()> {
        let mut h = Harness::builder(fixtures::grid(2, 1, 1, 1))
            .disabled()
            .build()?;
        let before = h.controller.form().clone();
        for request in [MoveRequest::Prev, MoveRequest::Next, MoveRequest::Submit] {
            h.controller.dispatch(Event::NavigationRequest(request))?;
            assert_eq!(
                h.events(),
                vec![Event::NavigationDenied {
                    reason: DenyReason::Disabled
                }]
            );
        }
        assert_eq!(h.controller.form(), &before);

        h.controller.set_navigation_enabled(true);
        h.next()?;
        assert_eq!(h.position().card, Some(1));
        Ok(())
    }

    #[test]
    fn revision_counts_commits() -> Result<()> {
        let mut h = Harness::builder(fixtures::grid(1, 1, 1, 3))
            .step_mode(StepMode::Field)
            .build()?;
        assert_eq!(h.controller.form().state().revision, 1);
        h.next()?;
        h.next()?;
        h.next()?;
        let state = h.controller.form().state();
        assert_eq!(state.revision, 3);
        assert_eq!(
            state.level(Level::Field).and_then(|p| p.current()).map(|id| id.as_str()),
            Some("card-0-set-0-group-0-field-2")
        );
        Ok(())
    }
}

//! Integration tests for navigation controls and the confirm key.

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use stepform::{
        Binding, ButtonKind, DenyReason, Event, Focus, ItemId, Level, MoveRequest, StepMode,
        error::Result,
        event::key::{KeyCode, Shift},
        layout::{ButtonLayout, CardLayout, FormLayout},
        tutils::{fixtures, harness::Harness},
    };

    fn id(s: &str) -> ItemId {
        ItemId::new(s).unwrap()
    }

    #[test]
    fn active_next_wins_over_inactive_submit() -> Result<()> {
        let h = Harness::new(fixtures::signup())?;
        let buttons = h.controller.buttons();
        assert!(buttons.get("account-next").unwrap().is_active());
        assert!(!buttons.get("terms-submit").unwrap().is_active());
        assert_eq!(buttons.determine_next_or_submit(), MoveRequest::Next);
        Ok(())
    }

    #[test]
    fn bindings_follow_the_current_card() -> Result<()> {
        let mut h = Harness::new(fixtures::signup())?;
        let bound: Vec<&str> = h
            .controller
            .buttons()
            .buttons()
            .iter()
            .filter(|b| b.is_bound())
            .map(|b| b.id().as_str())
            .collect();
        assert_eq!(bound, vec!["account-next"]);

        h.click("account-next")?;
        assert_eq!(
            h.events(),
            vec![
                Event::NavigationChanged {
                    target: Level::Card
                },
                Event::Binding(Binding::Detach(id("account-next"))),
                Event::Binding(Binding::Attach(id("profile-prev"))),
                Event::Binding(Binding::Attach(id("profile-next"))),
            ]
        );

        h.click("profile-prev")?;
        assert_eq!(h.current(Level::Card).as_deref(), Some("account"));
        Ok(())
    }

    #[test]
    fn disabled_click_does_nothing() -> Result<()> {
        let mut h = Harness::new(fixtures::signup())?;
        h.set_valid("email-input", false)?;
        // Only the first group's fields are active on card entry.
        assert!(!h.controller.buttons().get("account-next").unwrap().is_disabled());

        h.set_valid("first-input", false)?;
        assert!(h.controller.buttons().get("account-next").unwrap().is_disabled());
        h.events();
        h.click("account-next")?;
        assert!(h.events().is_empty());
        assert_eq!(h.current(Level::Card).as_deref(), Some("account"));
        Ok(())
    }

    #[test]
    fn hidden_click_is_denied() -> Result<()> {
        let mut h = Harness::new(fixtures::signup())?;
        h.click("terms-submit")?;
        assert_eq!(
            h.events(),
            vec![Event::NavigationDenied {
                reason: DenyReason::Hidden
            }]
        );
        assert!(h.controller.click("no-such-button").is_err());
        Ok(())
    }

    #[test]
    fn form_level_controls_are_always_active() -> Result<()> {
        let layout = FormLayout::new()
            .card(CardLayout::new("a"))
            .card(CardLayout::new("b"))
            .button(ButtonLayout::new("back", ButtonKind::Prev))
            .button(ButtonLayout::new("forward", ButtonKind::Next));
        let mut h = Harness::new(layout)?;
        h.click("forward")?;
        assert_eq!(h.current(Level::Card).as_deref(), Some("b"));
        assert!(h.controller.buttons().get("forward").unwrap().is_bound());
        h.click("back")?;
        assert_eq!(h.current(Level::Card).as_deref(), Some("a"));
        Ok(())
    }

    #[test]
    fn confirm_key_from_input_moves_once() -> Result<()> {
        let mut h = Harness::builder(fixtures::signup())
            .step_mode(StepMode::Field)
            .build()?;
        h.key(KeyCode::Enter, Focus::Input)?;
        assert_eq!(
            h.navigation_events(),
            vec![Event::NavigationChanged {
                target: Level::Field
            }]
        );
        assert_eq!(h.current(Level::Field).as_deref(), Some("last"));

        h.key(KeyCode::Enter, Focus::Button)?;
        h.key(KeyCode::Enter, Focus::Outside)?;
        h.key(Shift + KeyCode::Enter, Focus::Input)?;
        h.key('x', Focus::Root)?;
        assert!(h.navigation_events().is_empty());
        assert_eq!(h.current(Level::Field).as_deref(), Some("last"));
        Ok(())
    }

    #[test]
    fn confirm_key_submits_on_the_last_card() -> Result<()> {
        let mut h = Harness::new(fixtures::signup())?;
        h.next()?;
        h.next()?;
        assert_eq!(h.current(Level::Card).as_deref(), Some("terms"));
        assert_eq!(
            h.controller.buttons().determine_next_or_submit(),
            MoveRequest::Submit
        );
        h.events();

        h.key(KeyCode::Enter, Focus::Root)?;
        assert_eq!(h.navigation_events(), vec![Event::SubmitRequest]);
        Ok(())
    }

    #[test]
    fn confirm_key_is_gated_like_next() -> Result<()> {
        let mut h = Harness::new(fixtures::signup())?;
        h.set_valid("first-input", false)?;
        h.events();
        h.key(KeyCode::Enter, Focus::Input)?;
        assert_eq!(
            h.navigation_events(),
            vec![Event::NavigationDenied {
                reason: DenyReason::Invalid
            }]
        );
        Ok(())
    }
}

//! Canned layouts.

use crate::{
    buttons::ButtonKind,
    layout::{
        ButtonLayout, CardLayout, FieldLayout, FormLayout, GroupLayout, InputLayout, SetLayout,
    },
};

/// A regular layout: `cards` cards, each with `sets` sets of `groups` groups
/// of `fields` fields, one input per field.
///
/// Ids are hierarchical: `card-0`, `card-0-set-1`, `card-0-set-1-group-0`,
/// `card-0-set-1-group-0-field-2` and its input
/// `card-0-set-1-group-0-field-2-input`. Every card but the first carries a
/// `card-N-prev` control, every card but the last a `card-N-next`, and the
/// last card a `card-N-submit`.
pub fn grid(cards: usize, sets: usize, groups: usize, fields: usize) -> FormLayout {
    let mut layout = FormLayout::new();
    for c in 0..cards {
        let card_id = format!("card-{c}");
        let mut card = CardLayout::new(&card_id);
        for s in 0..sets {
            let set_id = format!("{card_id}-set-{s}");
            let mut set = SetLayout::new(&set_id);
            for g in 0..groups {
                let group_id = format!("{set_id}-group-{g}");
                let mut group = GroupLayout::new(&group_id);
                for f in 0..fields {
                    let field_id = format!("{group_id}-field-{f}");
                    group = group.field(
                        FieldLayout::new(&field_id)
                            .input(InputLayout::new(&format!("{field_id}-input"))),
                    );
                }
                set = set.group(group);
            }
            card = card.set(set);
        }
        if c > 0 {
            card = card.button(ButtonLayout::new(&format!("{card_id}-prev"), ButtonKind::Prev));
        }
        if c + 1 < cards {
            card = card.button(ButtonLayout::new(&format!("{card_id}-next"), ButtonKind::Next));
        } else {
            card = card.button(ButtonLayout::new(
                &format!("{card_id}-submit"),
                ButtonKind::Submit,
            ));
        }
        layout = layout.card(card);
    }
    layout
}

/// Id of the single input under a grid field.
pub fn grid_input(card: usize, set: usize, group: usize, field: usize) -> String {
    format!("card-{card}-set-{set}-group-{group}-field-{field}-input")
}

/// A three-card signup form with a terms card that has no fields.
///
/// - `account`: one set, two groups (`name` with `first`/`last`, `login`
///   with `email`).
/// - `profile`: two sets (`about` with a `bio` group holding an optional
///   excluded `website` input, and `prefs` with a `newsletter` group).
/// - `terms`: a card with nothing to fill in.
pub fn signup() -> FormLayout {
    let field = |id: &str| FieldLayout::new(id).input(InputLayout::new(&format!("{id}-input")));
    FormLayout::new()
        .card(
            CardLayout::new("account")
                .set(
                    SetLayout::new("account-main")
                        .group(GroupLayout::new("name").field(field("first")).field(field("last")))
                        .group(GroupLayout::new("login").field(field("email"))),
                )
                .button(ButtonLayout::new("account-next", ButtonKind::Next)),
        )
        .card(
            CardLayout::new("profile")
                .set(
                    SetLayout::new("about").group(
                        GroupLayout::new("bio").field(field("bio")).field(
                            FieldLayout::new("website")
                                .input(InputLayout::new("website-input").included(false)),
                        ),
                    ),
                )
                .set(
                    SetLayout::new("prefs")
                        .group(GroupLayout::new("newsletter").field(field("newsletter"))),
                )
                .button(ButtonLayout::new("profile-prev", ButtonKind::Prev))
                .button(ButtonLayout::new("profile-next", ButtonKind::Next)),
        )
        .card(
            CardLayout::new("terms")
                .button(ButtonLayout::new("terms-prev", ButtonKind::Prev))
                .button(ButtonLayout::new("terms-submit", ButtonKind::Submit)),
        )
}

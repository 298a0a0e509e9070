// SPDX-License-Identifier: MPL-2.0
//! Rendering for the gallery screen.

use super::{EditState, Message, State};
use crate::gallery::{Collection, LoadStatus, ThumbnailCache};
use crate::i18n::I18n;
use crate::ui::design_tokens::{border, opacity, palette, radius, shadow, sizing, spacing, typography};
use iced::widget::space::horizontal as horizontal_space;
use iced::widget::{
    button, container, image, mouse_area, scrollable, stack, text, text_input,
    Column, Container, Row, Text,
};
use iced::{alignment, Color, Element, Length, Theme};

/// Tiles per grid row.
const GRID_COLUMNS: usize = 3;

/// Renders the whole screen: navbar, upload target, grid, and (when open)
/// the edit dialog stacked on top.
pub fn view<'a>(
    state: &'a State,
    collection: &'a Collection,
    thumbnails: &'a ThumbnailCache,
    i18n: &'a I18n,
) -> Element<'a, Message> {
    let content = Column::new()
        .spacing(spacing::MD)
        .push(navbar(i18n))
        .push(upload_target(i18n))
        .push(grid_or_status(state, collection, thumbnails, i18n));

    let base: Element<'a, Message> = Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(spacing::LG)
        .into();

    match state.editing() {
        Some(editing) => stack![base, edit_dialog(editing, i18n)].into(),
        None => base,
    }
}

fn navbar<'a>(i18n: &'a I18n) -> Element<'a, Message> {
    let title = Text::new(i18n.tr("app-title")).size(typography::TITLE_MD);

    let refresh = button(Text::new(i18n.tr("gallery-refresh")).size(typography::BODY_SM))
        .on_press(Message::RefreshPressed)
        .padding(spacing::XS)
        .style(button::secondary);

    let logout = button(Text::new(i18n.tr("gallery-logout")).size(typography::BODY_SM))
        .on_press(Message::LogoutPressed)
        .padding(spacing::XS)
        .style(button::secondary);

    Container::new(
        Row::new()
            .align_y(alignment::Vertical::Center)
            .spacing(spacing::SM)
            .push(title)
            .push(horizontal_space())
            .push(refresh)
            .push(logout),
    )
    .width(Length::Fill)
    .height(Length::Fixed(sizing::NAVBAR_HEIGHT))
    .into()
}

fn upload_target<'a>(i18n: &'a I18n) -> Element<'a, Message> {
    let hint = Column::new()
        .align_x(alignment::Horizontal::Center)
        .spacing(spacing::XXS)
        .push(Text::new("\u{2B06}").size(typography::TITLE_SM))
        .push(Text::new(i18n.tr("gallery-upload-hint")).size(typography::BODY_SM));

    button(
        Container::new(hint)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(alignment::Horizontal::Center)
            .align_y(alignment::Vertical::Center),
    )
    .width(Length::Fill)
    .height(Length::Fixed(sizing::UPLOAD_TARGET_HEIGHT))
    .on_press(Message::UploadPressed)
    .style(upload_target_style)
    .into()
}

fn grid_or_status<'a>(
    state: &'a State,
    collection: &'a Collection,
    thumbnails: &'a ThumbnailCache,
    i18n: &'a I18n,
) -> Element<'a, Message> {
    if collection.is_empty() {
        let status_text = match collection.status() {
            LoadStatus::Loading => i18n.tr("gallery-loading"),
            LoadStatus::Failed => collection
                .error()
                .map(str::to_string)
                .unwrap_or_else(|| i18n.tr("error-unexpected")),
            LoadStatus::Idle | LoadStatus::Succeeded => i18n.tr("gallery-empty"),
        };

        let mut status = Column::new()
            .align_x(alignment::Horizontal::Center)
            .spacing(spacing::SM)
            .push(Text::new(status_text).size(typography::BODY));

        if collection.status() == LoadStatus::Failed {
            status = status.push(
                button(Text::new(i18n.tr("gallery-retry")).size(typography::BODY_SM))
                    .on_press(Message::RefreshPressed)
                    .padding(spacing::XS)
                    .style(button::primary),
            );
        }

        return Container::new(status)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(alignment::Horizontal::Center)
            .align_y(alignment::Vertical::Center)
            .into();
    }

    let mut grid = Column::new().spacing(spacing::MD);
    for (row_index, chunk) in collection.records().chunks(GRID_COLUMNS).enumerate() {
        let mut row = Row::new().spacing(spacing::MD);
        for (column_index, record) in chunk.iter().enumerate() {
            let index = row_index * GRID_COLUMNS + column_index;
            row = row.push(tile(state, record, index, thumbnails, i18n));
        }
        grid = grid.push(row);
    }

    scrollable(grid).width(Length::Fill).height(Length::Fill).into()
}

fn tile<'a>(
    state: &'a State,
    record: &'a crate::api::ImageRecord,
    index: usize,
    thumbnails: &'a ThumbnailCache,
    i18n: &'a I18n,
) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match thumbnails.peek(record.id) {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(sizing::TILE_IMAGE_HEIGHT))
            .content_fit(iced::ContentFit::Cover)
            .into(),
        None => Container::new(
            Text::new(i18n.tr("gallery-thumbnail-pending")).size(typography::CAPTION),
        )
        .width(Length::Fill)
        .height(Length::Fixed(sizing::TILE_IMAGE_HEIGHT))
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center)
        .style(placeholder_style)
        .into(),
    };

    let mut body = Column::new()
        .spacing(spacing::XXS)
        .push(picture)
        .push(
            Container::new(Text::new(record.title.clone()).size(typography::CAPTION))
                .width(Length::Fill)
                .align_x(alignment::Horizontal::Center),
        );

    // Actions appear on the hovered tile only, mirroring the grid's
    // hover-overlay behaviour.
    if state.hovered_tile() == Some(index) && !state.drag().is_dragging() {
        let edit = button(Text::new(i18n.tr("gallery-edit")).size(typography::CAPTION))
            .on_press(Message::EditPressed {
                id: record.id,
                title: record.title.clone(),
            })
            .padding(spacing::XXS)
            .style(button::secondary);
        let delete = button(Text::new(i18n.tr("gallery-delete")).size(typography::CAPTION))
            .on_press(Message::DeletePressed { id: record.id })
            .padding(spacing::XXS)
            .style(button::danger);

        body = body.push(
            Row::new()
                .spacing(spacing::XS)
                .push(horizontal_space())
                .push(edit)
                .push(delete)
                .push(horizontal_space()),
        );
    }

    let is_drop_target = state.drag().drop_target() == Some(index)
        && state.drag().dragged_id() != Some(record.id);
    let is_dragged = state.drag().dragged_id() == Some(record.id);

    let framed = Container::new(body)
        .width(Length::Fixed(sizing::TILE_WIDTH))
        .padding(spacing::XS)
        .style(move |theme: &Theme| tile_style(theme, is_drop_target, is_dragged));

    mouse_area(framed)
        .on_press(Message::TilePressed {
            id: record.id,
            index,
        })
        .on_release(Message::TileReleased { index })
        .on_enter(Message::TileEntered { index })
        .on_exit(Message::TileExited { index })
        .into()
}

fn edit_dialog<'a>(editing: &'a EditState, i18n: &'a I18n) -> Element<'a, Message> {
    let replacement_label = editing
        .replacement
        .as_ref()
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned());

    let mut picker_row = Row::new().spacing(spacing::SM).align_y(alignment::Vertical::Center).push(
        button(Text::new(i18n.tr("gallery-edit-pick-file")).size(typography::BODY_SM))
            .on_press(Message::EditPickReplacement)
            .padding(spacing::XS)
            .style(button::secondary),
    );
    if let Some(label) = replacement_label {
        picker_row = picker_row.push(Text::new(label).size(typography::BODY_SM));
    }

    let actions = Row::new()
        .spacing(spacing::SM)
        .push(horizontal_space())
        .push(
            button(Text::new(i18n.tr("gallery-edit-cancel")).size(typography::BODY_SM))
                .on_press(Message::EditCancelled)
                .padding(spacing::XS)
                .style(button::secondary),
        )
        .push(
            button(Text::new(i18n.tr("gallery-edit-save")).size(typography::BODY_SM))
                .on_press(Message::EditSavePressed)
                .padding(spacing::XS)
                .style(button::primary),
        );

    let card = Column::new()
        .spacing(spacing::MD)
        .push(Text::new(i18n.tr("gallery-edit-title")).size(typography::TITLE_SM))
        .push(
            Column::new()
                .spacing(spacing::XXS)
                .push(Text::new(i18n.tr("gallery-edit-title-label")).size(typography::BODY_SM))
                .push(
                    text_input(&i18n.tr("gallery-edit-title-placeholder"), &editing.title)
                        .on_input(Message::EditTitleChanged)
                        .padding(spacing::XS)
                        .size(typography::BODY),
                ),
        )
        .push(picker_row)
        .push(actions);

    let card = Container::new(card)
        .width(Length::Fixed(sizing::DIALOG_WIDTH))
        .padding(spacing::LG)
        .style(dialog_card_style);

    // Backdrop dims the grid; clicking it closes the dialog.
    let backdrop = mouse_area(
        Container::new(text(""))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(backdrop_style),
    )
    .on_press(Message::EditCancelled);

    stack![
        backdrop,
        Container::new(card)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(alignment::Horizontal::Center)
            .align_y(alignment::Vertical::Center)
    ]
    .into()
}

fn tile_style(theme: &Theme, is_drop_target: bool, is_dragged: bool) -> container::Style {
    let palette_ext = theme.extended_palette();
    let border_color = if is_drop_target {
        palette::PRIMARY_500
    } else if is_dragged {
        palette::PRIMARY_400
    } else {
        palette_ext.background.weak.color
    };
    let border_width = if is_drop_target || is_dragged {
        border::WIDTH_MD
    } else {
        border::WIDTH_SM
    };

    container::Style {
        background: Some(iced::Background::Color(palette_ext.background.base.color)),
        border: iced::Border {
            color: border_color,
            width: border_width,
            radius: radius::MD.into(),
        },
        shadow: if is_dragged { shadow::MD } else { shadow::NONE },
        text_color: Some(theme.palette().text),
        ..Default::default()
    }
}

fn placeholder_style(theme: &Theme) -> container::Style {
    container::Style {
        background: Some(iced::Background::Color(
            theme.extended_palette().background.weak.color,
        )),
        border: iced::Border {
            radius: radius::SM.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn upload_target_style(theme: &Theme, status: button::Status) -> button::Style {
    let palette_ext = theme.extended_palette();
    let border_color = match status {
        button::Status::Hovered | button::Status::Pressed => palette::PRIMARY_500,
        _ => palette_ext.background.strong.color,
    };

    button::Style {
        background: Some(iced::Background::Color(palette_ext.background.base.color)),
        text_color: theme.palette().text,
        border: iced::Border {
            color: border_color,
            width: border::WIDTH_MD,
            radius: radius::MD.into(),
        },
        shadow: shadow::NONE,
        snap: true,
    }
}

fn dialog_card_style(theme: &Theme) -> container::Style {
    container::Style {
        background: Some(iced::Background::Color(
            theme.extended_palette().background.base.color,
        )),
        border: iced::Border {
            color: theme.extended_palette().background.weak.color,
            width: border::WIDTH_SM,
            radius: radius::LG.into(),
        },
        shadow: shadow::MD,
        text_color: Some(theme.palette().text),
        ..Default::default()
    }
}

fn backdrop_style(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(iced::Background::Color(Color {
            a: opacity::OVERLAY_MEDIUM,
            ..palette::BLACK
        })),
        ..Default::default()
    }
}

// Rocket routes for the four Battlesnake endpoints.
//
// /move is synchronous: one evaluation is a handful of flood fills on an
// 11x11 board, well inside the turn budget.

use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::Value;

use crate::bot::Bot;
use crate::types::GameState;

/// Appearance from `[appearance]` in Snake.toml
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

#[post("/start", format = "json", data = "<start_req>")]
pub fn start(bot: &rocket::State<Bot>, start_req: Json<GameState>) -> Status {
    bot.start(
        &start_req.game,
        &start_req.turn,
        &start_req.board,
        &start_req.you,
    );

    Status::Ok
}

/// Answers `{"move": ...}`; falls back to the configured
/// direction when the snapshot is rejected or no move is safe
#[post("/move", format = "json", data = "<move_req>")]
pub fn get_move(bot: &rocket::State<Bot>, move_req: Json<GameState>) -> Json<Value> {
    let response = bot.get_move(
        &move_req.game,
        &move_req.turn,
        &move_req.board,
        &move_req.you,
    );

    Json(response)
}

#[post("/end", format = "json", data = "<end_req>")]
pub fn end(bot: &rocket::State<Bot>, end_req: Json<GameState>) -> Status {
    bot.end(&end_req.game, &end_req.turn, &end_req.board, &end_req.you);

    Status::Ok
}

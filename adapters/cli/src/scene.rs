//! Converts controller snapshots into rendering scenes.

use anyhow::Result;
use snake_rendering::{ApplePresentation, HudPresentation, Scene};
use snake_system_controller::RenderSnapshot;

/// Builds an empty scene sized for the snapshot's grid.
pub(crate) fn scene_for(snapshot: &RenderSnapshot) -> Result<Scene> {
    let mut scene = Scene::for_geometry(&snapshot.geometry)?;
    populate(&mut scene, snapshot, false);
    Ok(scene)
}

/// Copies the snapshot into `scene`, relaying out the board if the grid changed.
pub(crate) fn populate(scene: &mut Scene, snapshot: &RenderSnapshot, paused: bool) {
    let cell_length = snapshot.geometry.unit() as f32;
    if (scene.board.cell_length - cell_length).abs() > f32::EPSILON {
        if let Ok(fresh) = Scene::for_geometry(&snapshot.geometry) {
            scene.board = fresh.board;
            scene.wall = fresh.wall;
        }
    }

    scene.snake = Some(snapshot.snake.clone());
    scene.apples = snapshot
        .apples
        .iter()
        .map(|apple| ApplePresentation::new(apple.center, cell_length, apple.pulse))
        .collect();
    scene.hud = HudPresentation {
        score: snapshot.score,
        high_score: snapshot.high_score,
        outcome: snapshot.outcome,
        paused,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_core::{GameOptions, Outcome, Viewport};
    use snake_system_controller::{Game, MemoryHighScore};

    fn game(viewport: Viewport) -> Game<MemoryHighScore> {
        Game::new(
            GameOptions::default(),
            viewport,
            3,
            MemoryHighScore::new(12),
            (),
        )
    }

    #[test]
    fn snapshot_fills_every_layer() {
        let game = game(Viewport::new(1000, 2000));
        let snapshot = game.render_snapshot(0.0);

        let scene = scene_for(&snapshot).expect("scene");

        assert_eq!(scene.board.cell_length, 83.0);
        assert_eq!(scene.apples.len(), 1);
        assert_eq!(scene.apples[0].center, snapshot.apples[0].center);
        assert_eq!(scene.snake.as_ref(), Some(&snapshot.snake));
        assert_eq!(scene.hud.high_score, 12);
        assert!(!scene.hud.paused);
    }

    #[test]
    fn new_layout_replaces_the_board() {
        let mut scene = scene_for(&game(Viewport::new(1000, 2000)).render_snapshot(0.0))
            .expect("scene");
        let mut snapshot = game(Viewport::new(480, 800)).render_snapshot(0.5);
        snapshot.outcome = Some(Outcome::Won);

        populate(&mut scene, &snapshot, true);

        assert_eq!(scene.board.cell_length, snapshot.geometry.unit() as f32);
        assert_eq!(scene.wall.thickness, scene.board.cell_length / 4.0);
        assert_eq!(scene.hud.outcome, Some(Outcome::Won));
        assert!(scene.hud.paused);
    }
}

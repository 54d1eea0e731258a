/// Identity of a ship or missile for the lifetime of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Hands out fresh [`EntityId`]s. Ids are never reused within a manager.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Bounds of the logical playing area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn midline(&self) -> f32 {
        self.height / 2.0
    }
}

/// An axis-aligned body with a constant per-tick displacement.
///
/// The step operations never check bounds; whoever owns the entity decides
/// what the edges of the playfield mean for it.
#[derive(Clone, Debug, PartialEq)]
pub struct GameObject {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    speed_x: f32,
    speed_y: f32,
}

impl GameObject {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            speed_x: 0.0,
            speed_y: 0.0,
        }
    }

    /// Puts the body at a spawn point. Only used when an entity is placed,
    /// never for per-tick motion.
    pub fn place(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn set_speed(&mut self, speed_x: f32, speed_y: f32) {
        self.speed_x = speed_x;
        self.speed_y = speed_y;
    }

    pub fn move_left(&mut self) {
        self.x -= self.speed_x;
    }

    pub fn move_right(&mut self) {
        self.x += self.speed_x;
    }

    pub fn move_up(&mut self) {
        self.y -= self.speed_y;
    }

    pub fn move_down(&mut self) {
        self.y += self.speed_y;
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn speed_x(&self) -> f32 {
        self.speed_x
    }

    pub fn speed_y(&self) -> f32 {
        self.speed_y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_apply_configured_speed() {
        let mut body = GameObject::new(10.0, 10.0);
        body.place(100.0, 100.0);
        body.set_speed(3.0, 5.0);

        body.move_left();
        assert_eq!(body.x(), 97.0);
        body.move_right();
        body.move_right();
        assert_eq!(body.x(), 103.0);
        body.move_up();
        assert_eq!(body.y(), 95.0);
        body.move_down();
        body.move_down();
        assert_eq!(body.y(), 105.0);
    }

    #[test]
    fn steps_do_not_clamp() {
        let mut body = GameObject::new(10.0, 10.0);
        body.set_speed(4.0, 0.0);
        body.move_left();
        assert_eq!(body.x(), -4.0);
    }

    #[test]
    fn ids_are_unique() {
        let mut ids = IdAllocator::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
    }
}

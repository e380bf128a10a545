//! Turtle-graphics-delegating primitives (`spec.md` §6, §9): every
//! built-in here just forwards to the installed [`crate::interfaces::Turtle`]
//! backend and reports nothing beyond what that trait already hands back.
//! Naming follows classic Logo (`FD`/`BK`/`RT`/`LT`/...) since `spec.md`
//! only names the *interface methods* the host backend implements, not
//! the literal procedure identifiers - the mapping from one to the other
//! is this module's job, exactly as `rhai`'s standard package maps each
//! `Dynamic`-level operation to a user-facing function name.

use super::support::number;
use crate::error::LogoError;
use crate::fn_native::{command_async, reporter, reporter_async, PrimitiveFut};
use crate::interfaces::{PenMode, TurtleMode};
use crate::module::RoutineTable;
use crate::value::Value;
use crate::Interpreter;

fn forward_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let d = number(&args[0])?;
        interp.turtle_mut().move_by(d).await;
        Ok(())
    })
}

fn back_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let d = number(&args[0])?;
        interp.turtle_mut().move_by(-d).await;
        Ok(())
    })
}

fn right_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let d = number(&args[0])?;
        interp.turtle_mut().turn(d).await;
        Ok(())
    })
}

fn left_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let d = number(&args[0])?;
        interp.turtle_mut().turn(-d).await;
        Ok(())
    })
}

fn setpos_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let pair = super::support::elements(&args[0])?;
        if pair.len() != 2 {
            return Err(LogoError::ExpectedListOfLength(args[0].clone(), 2));
        }
        let x = number(&pair[0])?;
        let y = number(&pair[1])?;
        interp.turtle_mut().set_position(Some(x), Some(y)).await;
        Ok(())
    })
}

fn setxy_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let x = number(&args[0])?;
        let y = number(&args[1])?;
        interp.turtle_mut().set_position(Some(x), Some(y)).await;
        Ok(())
    })
}

fn setx_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let x = number(&args[0])?;
        interp.turtle_mut().set_position(Some(x), None).await;
        Ok(())
    })
}

fn sety_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let y = number(&args[0])?;
        interp.turtle_mut().set_position(None, Some(y)).await;
        Ok(())
    })
}

fn setheading_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let h = number(&args[0])?;
        interp.turtle_mut().set_heading(h).await;
        Ok(())
    })
}

fn home_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        interp.turtle_mut().home().await;
        Ok(())
    })
}

fn arc_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let angle = number(&args[0])?;
        let radius = number(&args[1])?;
        interp.turtle_mut().arc(angle, radius).await;
        Ok(())
    })
}

fn pos_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    let (x, y) = interp.turtle().get_xy();
    reporter(Ok(Value::list(vec![Value::number(x), Value::number(y)])))
}

fn xcor_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::number(interp.turtle().get_xy().0)))
}

fn ycor_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::number(interp.turtle().get_xy().1)))
}

fn heading_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::number(interp.turtle().get_heading())))
}

fn towards_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter_async(async move {
        let pair = super::support::elements(&args[0])?;
        if pair.len() != 2 {
            return Err(LogoError::ExpectedListOfLength(args[0].clone(), 2));
        }
        let x = number(&pair[0])?;
        let y = number(&pair[1])?;
        Ok(Value::number(interp.turtle().towards(x, y)))
    })
}

fn showturtle_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        interp.turtle_mut().set_visible(true).await;
        Ok(())
    })
}

fn hideturtle_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        interp.turtle_mut().set_visible(false).await;
        Ok(())
    })
}

fn shownp_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::boolean(interp.turtle().is_visible())))
}

fn clean_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        interp.turtle_mut().clear().await;
        Ok(())
    })
}

fn clearscreen_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        interp.turtle_mut().clear_screen().await;
        Ok(())
    })
}

fn parse_turtle_mode(v: &Value) -> Result<TurtleMode, LogoError> {
    match v.as_text().to_ascii_uppercase().as_str() {
        "WRAP" => Ok(TurtleMode::Wrap),
        "WINDOW" => Ok(TurtleMode::Window),
        "FENCE" => Ok(TurtleMode::Fence),
        _ => Err(LogoError::ExpectedString(v.clone())),
    }
}

fn turtle_mode_text(mode: TurtleMode) -> &'static str {
    match mode {
        TurtleMode::Wrap => "wrap",
        TurtleMode::Window => "window",
        TurtleMode::Fence => "fence",
    }
}

fn setturtlemode_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let mode = parse_turtle_mode(&args[0])?;
        interp.turtle_mut().set_turtle_mode(mode).await;
        Ok(())
    })
}

fn turtlemode_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::word(turtle_mode_text(interp.turtle().get_turtle_mode()))))
}

fn fill_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        interp.turtle_mut().fill().await;
        Ok(())
    })
}

fn beginpath_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        interp.turtle_mut().begin_path().await;
        Ok(())
    })
}

fn fillpath_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        interp.turtle_mut().fill_path(args[0].clone()).await;
        Ok(())
    })
}

fn label_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let text = args[0].as_text();
        interp.turtle_mut().draw_text(&text).await;
        Ok(())
    })
}

fn setfontsize_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let size = number(&args[0])?;
        interp.turtle_mut().set_font_size(size).await;
        Ok(())
    })
}

fn fontsize_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::number(interp.turtle().get_font_size())))
}

fn setfontname_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let name = args[0].as_text();
        interp.turtle_mut().set_font_name(&name).await;
        Ok(())
    })
}

fn fontname_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::word(interp.turtle().get_font_name())))
}

fn pendown_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        interp.turtle_mut().set_pen_down(true).await;
        Ok(())
    })
}

fn penup_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        interp.turtle_mut().set_pen_down(false).await;
        Ok(())
    })
}

fn pendownp_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::boolean(interp.turtle().is_pen_down())))
}

fn parse_pen_mode(v: &Value) -> Result<PenMode, LogoError> {
    match v.as_text().to_ascii_uppercase().as_str() {
        "PAINT" => Ok(PenMode::Paint),
        "ERASE" => Ok(PenMode::Erase),
        "REVERSE" => Ok(PenMode::Reverse),
        _ => Err(LogoError::ExpectedString(v.clone())),
    }
}

fn pen_mode_text(mode: PenMode) -> &'static str {
    match mode {
        PenMode::Paint => "paint",
        PenMode::Erase => "erase",
        PenMode::Reverse => "reverse",
    }
}

fn setpenmode_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let mode = parse_pen_mode(&args[0])?;
        interp.turtle_mut().set_pen_mode(mode).await;
        Ok(())
    })
}

fn penmode_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::word(pen_mode_text(interp.turtle().get_pen_mode()))))
}

fn setcolor_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        interp.turtle_mut().set_color(args[0].clone()).await;
        Ok(())
    })
}

fn pencolor_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(interp.turtle().get_color()))
}

fn setbg_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        interp.turtle_mut().set_bg_color(args[0].clone()).await;
        Ok(())
    })
}

fn bg_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(interp.turtle().get_bg_color()))
}

fn setwidth_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let w = number(&args[0])?;
        interp.turtle_mut().set_width(w).await;
        Ok(())
    })
}

fn width_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::number(interp.turtle().get_width())))
}

fn setscrunch_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let x = number(&args[0])?;
        let y = number(&args[1])?;
        if x == 0.0 || y == 0.0 {
            return Err(LogoError::ZeroScrunch);
        }
        interp.turtle_mut().set_scrunch(x, y).await;
        Ok(())
    })
}

fn scrunch_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    let (x, y) = interp.turtle().get_scrunch();
    reporter(Ok(Value::list(vec![Value::number(x), Value::number(y)])))
}

pub fn register(table: &mut RoutineTable) {
    table.register_primitive("FORWARD", 1, forward_fn);
    table.register_primitive("FD", 1, forward_fn);
    table.register_primitive("BACK", 1, back_fn);
    table.register_primitive("BK", 1, back_fn);
    table.register_primitive("RIGHT", 1, right_fn);
    table.register_primitive("RT", 1, right_fn);
    table.register_primitive("LEFT", 1, left_fn);
    table.register_primitive("LT", 1, left_fn);
    table.register_primitive("SETPOS", 1, setpos_fn);
    table.register_primitive("SETXY", 2, setxy_fn);
    table.register_primitive("SETX", 1, setx_fn);
    table.register_primitive("SETY", 1, sety_fn);
    table.register_primitive("SETHEADING", 1, setheading_fn);
    table.register_primitive("SETH", 1, setheading_fn);
    table.register_primitive("HOME", 0, home_fn);
    table.register_primitive("ARC", 2, arc_fn);
    table.register_primitive("POS", 0, pos_fn);
    table.register_primitive("XCOR", 0, xcor_fn);
    table.register_primitive("YCOR", 0, ycor_fn);
    table.register_primitive("HEADING", 0, heading_fn);
    table.register_primitive("TOWARDS", 1, towards_fn);
    table.register_primitive("SHOWTURTLE", 0, showturtle_fn);
    table.register_primitive("ST", 0, showturtle_fn);
    table.register_primitive("HIDETURTLE", 0, hideturtle_fn);
    table.register_primitive("HT", 0, hideturtle_fn);
    table.register_primitive("SHOWNP", 0, shownp_fn);
    table.register_primitive("CLEAN", 0, clean_fn);
    table.register_primitive("CLEARSCREEN", 0, clearscreen_fn);
    table.register_primitive("CS", 0, clearscreen_fn);
    table.register_primitive("SETTURTLEMODE", 1, setturtlemode_fn);
    table.register_primitive("TURTLEMODE", 0, turtlemode_fn);
    table.register_primitive("FILL", 0, fill_fn);
    table.register_primitive("BEGINPATH", 0, beginpath_fn);
    table.register_primitive("FILLPATH", 1, fillpath_fn);
    table.register_primitive("LABEL", 1, label_fn);
    table.register_primitive("SETFONTSIZE", 1, setfontsize_fn);
    table.register_primitive("FONTSIZE", 0, fontsize_fn);
    table.register_primitive("SETFONTNAME", 1, setfontname_fn);
    table.register_primitive("FONTNAME", 0, fontname_fn);
    table.register_primitive("PENDOWN", 0, pendown_fn);
    table.register_primitive("PD", 0, pendown_fn);
    table.register_primitive("PENUP", 0, penup_fn);
    table.register_primitive("PU", 0, penup_fn);
    table.register_primitive("PENDOWNP", 0, pendownp_fn);
    table.register_primitive("SETPENMODE", 1, setpenmode_fn);
    table.register_primitive("PENMODE", 0, penmode_fn);
    table.register_primitive("SETCOLOR", 1, setcolor_fn);
    table.register_primitive("SETPC", 1, setcolor_fn);
    table.register_primitive("PENCOLOR", 0, pencolor_fn);
    table.register_primitive("PC", 0, pencolor_fn);
    table.register_primitive("SETBG", 1, setbg_fn);
    table.register_primitive("BG", 0, bg_fn);
    table.register_primitive("SETWIDTH", 1, setwidth_fn);
    table.register_primitive("SETPENSIZE", 1, setwidth_fn);
    table.register_primitive("PENSIZE", 0, width_fn);
    table.register_primitive("WIDTH", 0, width_fn);
    table.register_primitive("SETSCRUNCH", 2, setscrunch_fn);
    table.register_primitive("SCRUNCH", 0, scrunch_fn);
}

#[cfg(test)]
mod tests {
    use crate::value::Value;
    use crate::Interpreter;

    #[test]
    fn forward_and_right_update_turtle_position() {
        let mut interp = Interpreter::headless();
        futures::executor::block_on(interp.run("fd 100 rt 90 fd 50")).unwrap();
        let (x, y) = interp.turtle().get_xy();
        assert!((x - 50.0).abs() < 1e-6);
        assert!((y - 100.0).abs() < 1e-6);
    }

    #[test]
    fn setxy_then_pos_round_trips() {
        let mut interp = Interpreter::headless();
        let result = futures::executor::block_on(interp.run("setxy 3 4 output pos")).unwrap();
        assert_eq!(
            result,
            Some(Value::list(vec![Value::number(3.0), Value::number(4.0)]))
        );
    }

    #[test]
    fn hideturtle_then_shownp_is_false() {
        let mut interp = Interpreter::headless();
        let result = futures::executor::block_on(interp.run("ht output shownp")).unwrap();
        assert_eq!(result, Some(Value::boolean(false)));
    }

    #[test]
    fn setscrunch_rejects_zero() {
        let mut interp = Interpreter::headless();
        let result = futures::executor::block_on(interp.run("setscrunch 0 1"));
        assert!(matches!(result, Err(crate::error::LogoError::ZeroScrunch)));
    }

    #[test]
    fn setturtlemode_then_turtlemode_round_trips() {
        let mut interp = Interpreter::headless();
        let result = futures::executor::block_on(interp.run("setturtlemode \"fence output turtlemode")).unwrap();
        assert_eq!(result, Some(Value::word("fence")));
    }
}

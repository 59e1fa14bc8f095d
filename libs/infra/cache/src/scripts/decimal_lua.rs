// [libs/infra/cache/src/scripts/decimal_lua.rs]
//! The string-based big-decimal helper shared by every atomic script.
//! Lua 5.1 numbers are IEEE-754 doubles, which lose precision past 2^53 —
//! exactly the kind of precision loss that matters for values exceeding
//! 2^63. This fragment reimplements add/sub/rescale over decimal-digit
//! strings instead, so the script can never drift from
//! `ledgercore_decimal::ScaledDecimal`'s truncation-toward-zero rule —
//! any divergence between client validation and script validation would
//! open a race window.
//!
//! Prepended (via Lua's `local decimal = (function() ... end)()` idiom)
//! to every script constant in this module.
pub const DECIMAL_LUA: &str = r#"
local decimal = {}

-- Splits a canonical decimal string ("-?\d+(\.\d+)?") into a sign (1/-1),
-- an unsigned digit string with no decimal point, and its scale.
function decimal.parse(raw)
  local sign = 1
  local body = raw
  if body:sub(1, 1) == "-" then
    sign = -1
    body = body:sub(2)
  end
  local int_part, frac_part = body:match("^(%d*)%.?(%d*)$")
  int_part = int_part or "0"
  frac_part = frac_part or ""
  if int_part == "" then int_part = "0" end
  local digits = (int_part .. frac_part):gsub("^0+(%d)", "%1")
  return sign, digits, #frac_part
end

function decimal.format(sign, digits, scale)
  digits = digits:gsub("^0+(%d)", "%1")
  if digits == "" then digits = "0" end
  while #digits <= scale do
    digits = "0" .. digits
  end
  local split_at = #digits - scale
  local int_part = digits:sub(1, split_at)
  local frac_part = digits:sub(split_at + 1)
  local out = int_part
  if scale > 0 then
    out = out .. "." .. frac_part
  end
  if sign < 0 and digits:match("[1-9]") then
    out = "-" .. out
  end
  return out
end

-- Widens `digits` at `scale` to `new_scale` by appending zeros, or
-- narrows it by dropping trailing digits (truncation toward zero — the
-- sign is carried separately and never affects which digits are kept).
function decimal.rescale_digits(digits, scale, new_scale)
  if new_scale == scale then
    return digits
  elseif new_scale > scale then
    return digits .. string.rep("0", new_scale - scale)
  else
    local drop = scale - new_scale
    if #digits <= drop then
      return "0"
    end
    return digits:sub(1, #digits - drop)
  end
end

local function cmp_digits(a, b)
  if #a ~= #b then
    return #a < #b and -1 or 1
  end
  if a == b then return 0 end
  return a < b and -1 or 1
end

local function add_digits(a, b)
  local result = {}
  local carry = 0
  local ia, ib = #a, #b
  while ia > 0 or ib > 0 or carry > 0 do
    local da = ia > 0 and tonumber(a:sub(ia, ia)) or 0
    local db = ib > 0 and tonumber(b:sub(ib, ib)) or 0
    local sum = da + db + carry
    table.insert(result, 1, tostring(sum % 10))
    carry = math.floor(sum / 10)
    ia = ia - 1
    ib = ib - 1
  end
  return table.concat(result)
end

-- Requires |a| >= |b|.
local function sub_digits(a, b)
  local result = {}
  local borrow = 0
  local ia, ib = #a, #b
  while ia > 0 do
    local da = tonumber(a:sub(ia, ia))
    local db = ib > 0 and tonumber(b:sub(ib, ib)) or 0
    local diff = da - db - borrow
    if diff < 0 then
      diff = diff + 10
      borrow = 1
    else
      borrow = 0
    end
    table.insert(result, 1, tostring(diff))
    ia = ia - 1
    ib = ib - 1
  end
  return result[1] and table.concat(result):gsub("^0+(%d)", "%1") or "0"
end

-- Signed add at a common scale. Returns (sign, digits).
function decimal.add_signed(sign_a, digits_a, sign_b, digits_b)
  if sign_a == sign_b then
    return sign_a, add_digits(digits_a, digits_b)
  end
  local order = cmp_digits(digits_a, digits_b)
  if order == 0 then
    return 1, "0"
  elseif order > 0 then
    return sign_a, sub_digits(digits_a, digits_b)
  else
    return sign_b, sub_digits(digits_b, digits_a)
  end
end

-- Rescales both values to their common (max) scale, returning
-- (sign_a, digits_a, sign_b, digits_b, scale).
function decimal.align(raw_a, raw_b)
  local sign_a, digits_a, scale_a = decimal.parse(raw_a)
  local sign_b, digits_b, scale_b = decimal.parse(raw_b)
  local scale = math.max(scale_a, scale_b)
  digits_a = decimal.rescale_digits(digits_a, scale_a, scale)
  digits_b = decimal.rescale_digits(digits_b, scale_b, scale)
  return sign_a, digits_a, sign_b, digits_b, scale
end

function decimal.is_negative(sign, digits)
  return sign < 0 and digits:match("[1-9]") ~= nil
end

return decimal
"#;
